//! Per-atom feature derivation

use crate::geometry::neighbors::all_neighbors;
use crate::structure::CrystalStructure;

/// Fixed short cutoff for the local coordination count, in the structure's
/// length units. Independent of (and always smaller than) the main neighbor
/// radius.
pub const COORDINATION_CUTOFF: f64 = 1.6;

/// Features per atom: atomic number and local coordination count.
pub const ATOM_FEATURE_DIM: usize = 2;

/// Feature matrix for all atoms, flattened row-major
/// `(n_atoms, ATOM_FEATURE_DIM)`, order-aligned with the structure.
pub fn atom_features(structure: &CrystalStructure) -> Vec<f32> {
    let coordination = all_neighbors(structure, COORDINATION_CUTOFF);
    structure
        .numbers()
        .iter()
        .zip(coordination.iter())
        .flat_map(|(&z, nbrs)| [z as f32, nbrs.len() as f32])
        .collect()
}
