//! Batch collation
//!
//! Merges independently built samples into one flattened batch. All
//! cross-referencing indices are shifted by the cumulative atom count of the
//! preceding samples, so they stay valid against the concatenated atom axis;
//! a range table maps each crystal back to its slice of the primary axis.
//!
//! Collation is strictly sequential over its input: the offset bookkeeping
//! depends on processing samples in order.

use std::borrow::Borrow;
use std::ops::Range;

use crate::processing::sample::GraphSample;

/// A batch of K crystal graphs over one flattened atom axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphBatch {
    /// Atom features, shape `(n_atoms, 2)`.
    pub atom_features: Vec<f32>,
    /// Neighbor features, shape `(n_atoms, max_num_nbr, basis_len)`.
    pub nbr_features: Vec<f32>,
    /// Neighbor indices, shape `(n_atoms, max_num_nbr)`, offset-corrected.
    pub nbr_indices: Vec<i32>,
    /// Concatenated primary index sets, offset-corrected.
    pub primary_indices: Vec<i32>,
    /// `crystal_groups[k]` is crystal k's contiguous range on the primary
    /// axis. The ranges partition `0..primary_indices.len()`.
    pub crystal_groups: Vec<Range<usize>>,
    /// Auxiliary features, shape `(n_crystals, aux_dim)`.
    pub aux_features: Vec<f32>,
    /// Targets, shape `(n_crystals, target_dim)`.
    pub targets: Vec<f32>,
    /// Identifiers, parallel to the crystal axis.
    pub ids: Vec<String>,
    pub n_atoms: usize,
    pub n_crystals: usize,
    pub max_num_nbr: usize,
    pub basis_len: usize,
}

/// Collate samples into one batch, in order.
///
/// All samples must share `max_num_nbr` and `basis_len` (they do when built
/// from one configuration). Accepts owned samples or `Arc`-shared ones.
pub fn collate<S: Borrow<GraphSample>>(samples: &[S]) -> GraphBatch {
    let first = samples.first().map(Borrow::borrow);
    let max_num_nbr = first.map_or(0, |s| s.max_num_nbr);
    let basis_len = first.map_or(0, |s| s.basis_len);

    let total_atoms: usize = samples.iter().map(|s| s.borrow().n_atoms).sum();
    let mut batch = GraphBatch {
        atom_features: Vec::with_capacity(total_atoms * 2),
        nbr_features: Vec::with_capacity(total_atoms * max_num_nbr * basis_len),
        nbr_indices: Vec::with_capacity(total_atoms * max_num_nbr),
        primary_indices: Vec::new(),
        crystal_groups: Vec::with_capacity(samples.len()),
        aux_features: Vec::new(),
        targets: Vec::new(),
        ids: Vec::with_capacity(samples.len()),
        n_atoms: total_atoms,
        n_crystals: samples.len(),
        max_num_nbr,
        basis_len,
    };

    let mut atom_offset: i32 = 0;
    let mut group_offset: usize = 0;
    for sample in samples {
        let sample = sample.borrow();
        debug_assert_eq!(sample.max_num_nbr, max_num_nbr);
        debug_assert_eq!(sample.basis_len, basis_len);

        batch.atom_features.extend_from_slice(&sample.atom_features);
        batch.nbr_features.extend_from_slice(&sample.nbr_features);
        batch
            .nbr_indices
            .extend(sample.nbr_indices.iter().map(|&i| i + atom_offset));
        batch
            .primary_indices
            .extend(sample.primary_indices.iter().map(|&i| i + atom_offset));
        batch
            .crystal_groups
            .push(group_offset..group_offset + sample.primary_indices.len());
        batch.aux_features.extend_from_slice(&sample.aux_features);
        batch.targets.extend_from_slice(&sample.target);
        batch.ids.push(sample.id.clone());

        atom_offset += sample.n_atoms as i32;
        group_offset += sample.primary_indices.len();
    }

    batch
}
