//! Single-crystal graph assembly
//!
//! Composes atom features, fixed-width neighbor tensors, the primary index
//! set, auxiliary scalars and targets into one immutable sample.

use thiserror::Error;

use crate::config::GraphConfig;
use crate::geometry::neighbors::all_neighbors;
use crate::geometry::radial_basis::{FilterError, GaussianFilter};
use crate::processing::features::atom_features;
use crate::processing::metal::select_metal_neighborhood;
use crate::structure::{CrystalStructure, StructureError};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("no metal atoms in structure {id}; cannot anchor the primary neighborhood")]
    NoMetalAtoms { id: String },
    #[error("unknown crystal identifier: {0}")]
    UnknownId(String),
    #[error("sample index {0} out of range")]
    IndexOutOfRange(usize),
    #[error("bad property record for {id}: {reason}")]
    BadRecord { id: String, reason: String },
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// A recoverable, identifier-attributed diagnostic emitted during sample
/// construction. Mirrored to `log::warn!` as it is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleWarning {
    pub id: String,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// An atom had fewer main-graph neighbors than `max_num_nbr`.
    FewNeighbors {
        atom: usize,
        found: usize,
        wanted: usize,
    },
    /// A metal atom had fewer extended neighbors than `metal_max_num_nbr`.
    FewMetalNeighbors {
        metal: usize,
        found: usize,
        wanted: usize,
    },
}

impl std::fmt::Display for SampleWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            WarningKind::FewNeighbors { atom, found, wanted } => write!(
                f,
                "{}: atom {} has {} of {} requested neighbors",
                self.id, atom, found, wanted
            ),
            WarningKind::FewMetalNeighbors { metal, found, wanted } => write!(
                f,
                "{}: metal atom {} has {} of {} requested neighbors",
                self.id, metal, found, wanted
            ),
        }
    }
}

/// The graph tensors of one crystal. Flattened row-major with explicit
/// dimensions; immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSample {
    /// Atom features, shape `(n_atoms, 2)`.
    pub atom_features: Vec<f32>,
    /// Radial-basis neighbor features, shape `(n_atoms, max_num_nbr, basis_len)`.
    pub nbr_features: Vec<f32>,
    /// Neighbor indices, shape `(n_atoms, max_num_nbr)`, values in `[0, n_atoms)`.
    pub nbr_indices: Vec<i32>,
    /// Primary index set, deduplicated, values in `[0, n_atoms)`.
    pub primary_indices: Vec<i32>,
    /// Auxiliary scalar features from the property table.
    pub aux_features: Vec<f32>,
    /// Target value(s).
    pub target: Vec<f32>,
    /// Crystal identifier.
    pub id: String,
    pub n_atoms: usize,
    pub max_num_nbr: usize,
    pub basis_len: usize,
}

/// Build the graph sample for one crystal.
///
/// Atoms with fewer than `max_num_nbr` neighbors get their index slots
/// padded with atom 0 and their distance slots padded with `radius + 1.0`,
/// which expands to near-zero Gaussian weight; atoms with more are truncated
/// to the closest `max_num_nbr`. Every shortfall is reported as a warning.
pub fn build_sample(
    structure: &CrystalStructure,
    id: &str,
    aux_features: &[f64],
    target: &[f64],
    config: &GraphConfig,
    filter: &GaussianFilter,
) -> Result<(GraphSample, Vec<SampleWarning>), BuildError> {
    let mut warnings = Vec::new();

    let neighborhood = select_metal_neighborhood(
        structure,
        id,
        config.metal_radius,
        config.metal_max_num_nbr,
        &mut warnings,
    )?;

    let atom_fea = atom_features(structure);

    let n_atoms = structure.len();
    let m = config.max_num_nbr;
    let pad_distance = config.radius + 1.0;

    let mut nbr_indices: Vec<i32> = Vec::with_capacity(n_atoms * m);
    let mut nbr_distances: Vec<f64> = Vec::with_capacity(n_atoms * m);
    for (atom, nbrs) in all_neighbors(structure, config.radius).iter().enumerate() {
        if nbrs.len() < m {
            log::warn!(
                "{}: atom {} has {} neighbors within {}, padding to {}; consider increasing radius",
                id,
                atom,
                nbrs.len(),
                config.radius,
                m
            );
            warnings.push(SampleWarning {
                id: id.to_string(),
                kind: WarningKind::FewNeighbors {
                    atom,
                    found: nbrs.len(),
                    wanted: m,
                },
            });
            for nbr in nbrs {
                nbr_indices.push(nbr.index as i32);
                nbr_distances.push(nbr.distance);
            }
            for _ in nbrs.len()..m {
                nbr_indices.push(0);
                nbr_distances.push(pad_distance);
            }
        } else {
            for nbr in &nbrs[..m] {
                nbr_indices.push(nbr.index as i32);
                nbr_distances.push(nbr.distance);
            }
        }
    }

    let nbr_features = filter.expand(&nbr_distances);

    Ok((
        GraphSample {
            atom_features: atom_fea,
            nbr_features,
            nbr_indices,
            primary_indices: neighborhood
                .primary_indices
                .iter()
                .map(|&i| i as i32)
                .collect(),
            aux_features: aux_features.iter().map(|&x| x as f32).collect(),
            target: target.iter().map(|&x| x as f32).collect(),
            id: id.to_string(),
            n_atoms,
            max_num_nbr: m,
            basis_len: filter.len(),
        },
        warnings,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::features::ATOM_FEATURE_DIM;

    fn test_config() -> GraphConfig {
        GraphConfig {
            max_num_nbr: 3,
            radius: 6.0,
            metal_max_num_nbr: 2,
            metal_radius: 8.0,
            ..GraphConfig::default()
        }
    }

    fn dense_structure() -> CrystalStructure {
        // Zn surrounded by four O within the main radius
        CrystalStructure::from_symbols(
            &["Zn", "O", "O", "O", "O"],
            vec![
                [0.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [0.0, 2.0, 0.0],
                [0.0, 0.0, 2.0],
                [-2.0, 0.0, 0.0],
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_sample_shapes_are_fixed() {
        let config = test_config();
        let filter = config.filter().unwrap();
        let s = dense_structure();
        let (sample, _) = build_sample(&s, "mof-1", &[0.5], &[1.25], &config, &filter).unwrap();

        assert_eq!(sample.n_atoms, 5);
        assert_eq!(sample.max_num_nbr, 3);
        assert_eq!(sample.basis_len, filter.len());
        assert_eq!(sample.atom_features.len(), 5 * ATOM_FEATURE_DIM);
        assert_eq!(sample.nbr_indices.len(), 5 * 3);
        assert_eq!(sample.nbr_features.len(), 5 * 3 * filter.len());
        assert_eq!(sample.aux_features, vec![0.5]);
        assert_eq!(sample.target, vec![1.25]);
        assert_eq!(sample.id, "mof-1");
    }

    #[test]
    fn test_truncation_keeps_closest() {
        let config = test_config();
        let filter = config.filter().unwrap();
        let s = dense_structure();
        let (sample, warnings) =
            build_sample(&s, "mof-1", &[], &[0.0], &config, &filter).unwrap();

        // Atom 0 has 4 in-range neighbors, truncated to the 3 closest;
        // all four O are at distance 2, so stable order keeps 1, 2, 3
        assert_eq!(&sample.nbr_indices[0..3], &[1, 2, 3]);
        assert!(warnings
            .iter()
            .all(|w| !matches!(w.kind, WarningKind::FewNeighbors { atom: 0, .. })));
    }

    #[test]
    fn test_padding_distance_and_index() {
        let config = test_config();
        let filter = config.filter().unwrap();
        // Zn with a single O neighbor: 2 of 3 slots padded
        let s = CrystalStructure::from_symbols(
            &["Zn", "O"],
            vec![[0.0; 3], [1.5, 0.0, 0.0]],
            None,
        )
        .unwrap();
        let (sample, warnings) =
            build_sample(&s, "sparse-1", &[], &[0.0], &config, &filter).unwrap();

        assert_eq!(sample.nbr_indices, vec![1, 0, 0, 0, 0, 0]);

        // Padded slots expand the distance radius + 1.0: the expansion of
        // that exact value must appear verbatim in the padded positions
        let mut pad_row = vec![0.0f32; filter.len()];
        filter.expand_into(config.radius + 1.0, &mut pad_row);
        let k = filter.len();
        for slot in [1usize, 2, 4, 5] {
            assert_eq!(&sample.nbr_features[slot * k..(slot + 1) * k], &pad_row[..]);
        }

        // Both atoms warned for the main graph, plus the metal shortfall
        let few: Vec<_> = warnings
            .iter()
            .filter(|w| matches!(w.kind, WarningKind::FewNeighbors { .. }))
            .collect();
        assert_eq!(few.len(), 2);
        assert!(warnings
            .iter()
            .all(|w| w.id == "sparse-1"));
    }

    #[test]
    fn test_no_metal_atoms_is_fatal() {
        let config = test_config();
        let filter = config.filter().unwrap();
        let s = CrystalStructure::from_symbols(
            &["C", "O"],
            vec![[0.0; 3], [1.5, 0.0, 0.0]],
            None,
        )
        .unwrap();
        let err = build_sample(&s, "organic-1", &[], &[0.0], &config, &filter).unwrap_err();
        assert!(matches!(err, BuildError::NoMetalAtoms { .. }));
    }

    #[test]
    fn test_isolated_metal_end_to_end() {
        // One metal atom, nothing within any radius: primary set is just
        // the metal itself and a warning is raised
        let config = test_config();
        let filter = config.filter().unwrap();
        let s = CrystalStructure::from_symbols(&["Zn"], vec![[0.0; 3]], None).unwrap();
        let (sample, warnings) =
            build_sample(&s, "lone-1", &[], &[0.0], &config, &filter).unwrap();

        assert_eq!(sample.primary_indices, vec![0]);
        assert!(warnings
            .iter()
            .any(|w| matches!(w.kind, WarningKind::FewMetalNeighbors { .. })));
    }

    #[test]
    fn test_primary_indices_within_bounds() {
        let config = test_config();
        let filter = config.filter().unwrap();
        let s = dense_structure();
        let (sample, _) = build_sample(&s, "mof-1", &[], &[0.0], &config, &filter).unwrap();

        assert!(!sample.primary_indices.is_empty());
        assert!(sample
            .primary_indices
            .iter()
            .all(|&i| i >= 0 && (i as usize) < sample.n_atoms));
        let mut dedup = sample.primary_indices.clone();
        dedup.dedup();
        assert_eq!(dedup, sample.primary_indices);
    }
}
