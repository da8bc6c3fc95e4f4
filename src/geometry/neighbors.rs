//! Within-radius neighbor search for crystal structures
//!
//! Every atom within the cutoff of a source atom is reported with its
//! Euclidean distance and base-site index, sorted ascending by distance.
//! For periodic structures each lattice image within the cutoff counts as a
//! separate neighbor carrying the index of its home-cell site.

use std::cmp::Ordering;

use nalgebra::Vector3;

use crate::geometry::cell_list::CellList;
use crate::geometry::distances::euclidean_distance;
use crate::structure::{CrystalStructure, Lattice};

/// Aperiodic structures below this size use brute force; above it, a cell
/// list is built once per full-structure query.
const BRUTE_FORCE_THRESHOLD: usize = 256;

/// One edge of the neighbor graph, as seen from a source atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub distance: f64,
    pub index: usize,
}

/// All atoms within `radius` of atom `site`, sorted ascending by distance.
/// Ties keep the stable enumeration order of the underlying query.
pub fn site_neighbors(structure: &CrystalStructure, site: usize, radius: f64) -> Vec<Neighbor> {
    let mut found = match structure.lattice() {
        Some(lattice) => periodic_site_neighbors(structure, lattice, site, radius),
        None => brute_site_neighbors(structure.positions(), site, radius),
    };
    sort_by_distance(&mut found);
    found
}

/// Neighbor lists for every atom in the structure, in atom order.
/// Each list is sorted ascending by distance.
pub fn all_neighbors(structure: &CrystalStructure, radius: f64) -> Vec<Vec<Neighbor>> {
    let n = structure.len();
    match structure.lattice() {
        Some(lattice) => {
            let translations = image_translations(lattice, radius);
            (0..n)
                .map(|i| {
                    let mut found =
                        periodic_neighbors_with(structure.positions(), i, radius, &translations);
                    sort_by_distance(&mut found);
                    found
                })
                .collect()
        }
        None if n <= BRUTE_FORCE_THRESHOLD => (0..n)
            .map(|i| {
                let mut found = brute_site_neighbors(structure.positions(), i, radius);
                sort_by_distance(&mut found);
                found
            })
            .collect(),
        None => {
            let positions = structure.positions();
            let cell_list = CellList::new(positions, radius);
            (0..n)
                .map(|i| {
                    let mut found: Vec<Neighbor> = cell_list
                        .query_neighbors(&positions[i], positions, radius)
                        .into_iter()
                        .filter(|&(j, _)| j != i)
                        .map(|(j, d)| Neighbor {
                            distance: d,
                            index: j,
                        })
                        .collect();
                    // Cell iteration order is not index order
                    found.sort_by(|a, b| a.index.cmp(&b.index));
                    sort_by_distance(&mut found);
                    found
                })
                .collect()
        }
    }
}

fn sort_by_distance(neighbors: &mut [Neighbor]) {
    // Stable sort so equidistant neighbors keep query order
    neighbors.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(Ordering::Equal)
    });
}

fn brute_site_neighbors(positions: &[[f64; 3]], site: usize, radius: f64) -> Vec<Neighbor> {
    let origin = positions[site];
    positions
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != site)
        .filter_map(|(j, pos)| {
            let d = euclidean_distance(&origin, pos);
            (d <= radius).then_some(Neighbor {
                distance: d,
                index: j,
            })
        })
        .collect()
}

/// Cartesian translations of all lattice images that can reach `radius`.
/// The zero translation comes first so self-exclusion stays cheap.
fn image_translations(lattice: &Lattice, radius: f64) -> Vec<Vector3<f64>> {
    let [na, nb, nc] = lattice.images_for_radius(radius);
    let mut translations =
        Vec::with_capacity(((2 * na + 1) * (2 * nb + 1) * (2 * nc + 1)) as usize);
    translations.push(Vector3::zeros());
    for a in -na..=na {
        for b in -nb..=nb {
            for c in -nc..=nc {
                if (a, b, c) != (0, 0, 0) {
                    translations.push(lattice.image_translation([a, b, c]));
                }
            }
        }
    }
    translations
}

fn periodic_site_neighbors(
    structure: &CrystalStructure,
    lattice: &Lattice,
    site: usize,
    radius: f64,
) -> Vec<Neighbor> {
    let translations = image_translations(lattice, radius);
    periodic_neighbors_with(structure.positions(), site, radius, &translations)
}

fn periodic_neighbors_with(
    positions: &[[f64; 3]],
    site: usize,
    radius: f64,
    translations: &[Vector3<f64>],
) -> Vec<Neighbor> {
    let origin = Vector3::from(positions[site]);
    let mut found = Vec::new();
    for (j, pos) in positions.iter().enumerate() {
        let base = Vector3::from(*pos);
        for (t_idx, t) in translations.iter().enumerate() {
            // The zero translation of the site itself is the atom, not a neighbor
            if j == site && t_idx == 0 {
                continue;
            }
            let d = (base + t - origin).norm();
            if d <= radius {
                found.push(Neighbor {
                    distance: d,
                    index: j,
                });
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::Lattice;

    fn aperiodic(positions: Vec<[f64; 3]>) -> CrystalStructure {
        let numbers = vec![6u8; positions.len()];
        CrystalStructure::new(numbers, positions, None).unwrap()
    }

    #[test]
    fn test_sorted_ascending() {
        let s = aperiodic(vec![
            [0.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
        ]);
        let nbrs = site_neighbors(&s, 0, 10.0);
        assert_eq!(nbrs.len(), 3);
        let dists: Vec<f64> = nbrs.iter().map(|n| n.distance).collect();
        assert!(dists.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(nbrs[0].index, 2);
        assert_eq!(nbrs[1].index, 3);
        assert_eq!(nbrs[2].index, 1);
    }

    #[test]
    fn test_radius_is_inclusive() {
        let s = aperiodic(vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.1, 0.0, 0.0]]);
        let nbrs = site_neighbors(&s, 0, 2.0);
        assert_eq!(nbrs.len(), 1);
        assert_eq!(nbrs[0].index, 1);
    }

    #[test]
    fn test_excludes_self() {
        let s = aperiodic(vec![[0.0; 3], [1.0, 0.0, 0.0]]);
        let all = all_neighbors(&s, 5.0);
        assert_eq!(all[0].len(), 1);
        assert_eq!(all[0][0].index, 1);
        assert_eq!(all[1].len(), 1);
        assert_eq!(all[1][0].index, 0);
    }

    #[test]
    fn test_tie_break_is_stable() {
        // Atoms 1 and 2 are equidistant from atom 0
        let s = aperiodic(vec![[0.0; 3], [1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]]);
        let nbrs = site_neighbors(&s, 0, 2.0);
        assert_eq!(nbrs[0].index, 1);
        assert_eq!(nbrs[1].index, 2);
    }

    #[test]
    fn test_periodic_simple_cubic() {
        // One atom in a cubic cell: first shell is the 6 face images
        let lat = Lattice::cubic(3.0).unwrap();
        let s = CrystalStructure::from_fractional(vec![26], vec![[0.0; 3]], lat).unwrap();

        let nbrs = site_neighbors(&s, 0, 3.0);
        assert_eq!(nbrs.len(), 6);
        assert!(nbrs.iter().all(|n| (n.distance - 3.0).abs() < 1e-9));
        assert!(nbrs.iter().all(|n| n.index == 0));

        // Second shell: 12 edge images at 3*sqrt(2)
        let nbrs = site_neighbors(&s, 0, 3.0 * 2.0f64.sqrt() + 1e-9);
        assert_eq!(nbrs.len(), 18);
    }

    #[test]
    fn test_periodic_neighbor_across_boundary() {
        // Two atoms near opposite faces are close through the boundary
        let lat = Lattice::cubic(10.0).unwrap();
        let s = CrystalStructure::from_fractional(
            vec![30, 8],
            vec![[0.05, 0.0, 0.0], [0.95, 0.0, 0.0]],
            lat,
        )
        .unwrap();

        let nbrs = site_neighbors(&s, 0, 2.0);
        assert_eq!(nbrs.len(), 1);
        assert_eq!(nbrs[0].index, 1);
        assert!((nbrs[0].distance - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cell_list_path_matches_brute_force() {
        // A 7x7x7 grid is large enough to take the cell-list path
        let mut positions = Vec::new();
        for x in 0..7 {
            for y in 0..7 {
                for z in 0..7 {
                    positions.push([x as f64 * 1.5, y as f64 * 1.5, z as f64 * 1.5]);
                }
            }
        }
        let s = aperiodic(positions.clone());
        assert!(s.len() > BRUTE_FORCE_THRESHOLD);

        let all = all_neighbors(&s, 2.0);
        for &site in &[0usize, 171, 342] {
            let mut brute = brute_site_neighbors(&positions, site, 2.0);
            sort_by_distance(&mut brute);
            assert_eq!(all[site], brute);
        }
    }
}
