//! Metal neighborhood selection
//!
//! Metal atoms anchor the chemically interesting region of a framework. For
//! each metal atom, its neighbors at the (larger) metal radius are collected
//! into fixed-length index lists; the deduplicated union of those lists and
//! the metal indices themselves forms the primary index set.

use crate::geometry::neighbors::site_neighbors;
use crate::processing::sample::{BuildError, SampleWarning, WarningKind};
use crate::structure::CrystalStructure;
use std::collections::BTreeSet;

/// The metal atoms of a structure and the primary index set they anchor.
#[derive(Debug, Clone)]
pub struct MetalNeighborhood {
    /// Indices of all metal atoms, in atom order.
    pub metal_indices: Vec<usize>,
    /// Deduplicated union of metal indices and their extended-radius
    /// neighbor indices, sorted ascending. Always non-empty.
    pub primary_indices: Vec<usize>,
}

/// Identify metal atoms and build the primary index set.
///
/// A per-metal neighbor list shorter than `metal_max_num_nbr` is padded with
/// atom index 0, matching the main-graph padding convention; the pad entries
/// flow into the union like real indices. Zero metal atoms is fatal.
pub fn select_metal_neighborhood(
    structure: &CrystalStructure,
    id: &str,
    metal_radius: f64,
    metal_max_num_nbr: usize,
    warnings: &mut Vec<SampleWarning>,
) -> Result<MetalNeighborhood, BuildError> {
    let metal_indices = structure.metal_indices();
    if metal_indices.is_empty() {
        return Err(BuildError::NoMetalAtoms { id: id.to_string() });
    }

    let mut union: BTreeSet<usize> = metal_indices.iter().copied().collect();
    for &metal in &metal_indices {
        let nbrs = site_neighbors(structure, metal, metal_radius);
        if nbrs.len() < metal_max_num_nbr {
            log::warn!(
                "{}: metal atom {} has {} neighbors within {}, padding to {}; consider increasing metal_radius",
                id,
                metal,
                nbrs.len(),
                metal_radius,
                metal_max_num_nbr
            );
            warnings.push(SampleWarning {
                id: id.to_string(),
                kind: WarningKind::FewMetalNeighbors {
                    metal,
                    found: nbrs.len(),
                    wanted: metal_max_num_nbr,
                },
            });
            union.extend(nbrs.iter().map(|n| n.index));
            // Short lists are padded with atom index 0, kept for
            // compatibility with the established numerical behavior
            union.insert(0);
        } else {
            union.extend(nbrs[..metal_max_num_nbr].iter().map(|n| n.index));
        }
    }

    Ok(MetalNeighborhood {
        metal_indices,
        primary_indices: union.into_iter().collect(),
    })
}
