//! Cell list algorithm for O(N) neighbor search
//!
//! Implements spatial hashing for efficient within-radius queries on
//! aperiodic structures. Periodic structures go through the image-expansion
//! path in `neighbors` instead.

use std::collections::HashMap;

use crate::geometry::distances::euclidean_distance_squared;

/// Cell index (grid position in 3D space)
type CellIndex = (i32, i32, i32);

/// Cell list for spatial hashing
pub struct CellList {
    /// Cell size (must be >= cutoff distance for queries)
    cell_size: f64,
    /// Maps cell index to list of atom indices in that cell
    cells: HashMap<CellIndex, Vec<usize>>,
    /// Bounding box minimum
    min_coords: [f64; 3],
}

impl CellList {
    /// Build a cell list from coordinates.
    pub fn new(coords: &[[f64; 3]], cell_size: f64) -> Self {
        let mut cells: HashMap<CellIndex, Vec<usize>> = HashMap::new();

        if coords.is_empty() {
            return Self {
                cell_size,
                cells,
                min_coords: [0.0, 0.0, 0.0],
            };
        }

        let mut min_coords = [f64::MAX; 3];
        for coord in coords {
            for i in 0..3 {
                min_coords[i] = min_coords[i].min(coord[i]);
            }
        }

        for (idx, coord) in coords.iter().enumerate() {
            let cell_idx = Self::coord_to_cell(coord, &min_coords, cell_size);
            cells.entry(cell_idx).or_default().push(idx);
        }

        Self {
            cell_size,
            cells,
            min_coords,
        }
    }

    fn coord_to_cell(coord: &[f64; 3], min_coords: &[f64; 3], cell_size: f64) -> CellIndex {
        let x = ((coord[0] - min_coords[0]) / cell_size).floor() as i32;
        let y = ((coord[1] - min_coords[1]) / cell_size).floor() as i32;
        let z = ((coord[2] - min_coords[2]) / cell_size).floor() as i32;
        (x, y, z)
    }

    /// Find all atoms within `cutoff` of a query point, with distances.
    ///
    /// Assumes `cutoff <= cell_size`. The query atom itself is not excluded;
    /// callers filter by index.
    pub fn query_neighbors(
        &self,
        query: &[f64; 3],
        coords: &[[f64; 3]],
        cutoff: f64,
    ) -> Vec<(usize, f64)> {
        let cutoff_sq = cutoff * cutoff;
        let (cx, cy, cz) = Self::coord_to_cell(query, &self.min_coords, self.cell_size);

        let mut neighbors = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(atom_indices) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) {
                        for &idx in atom_indices {
                            let dist_sq = euclidean_distance_squared(&coords[idx], query);
                            if dist_sq <= cutoff_sq {
                                neighbors.push((idx, dist_sq.sqrt()));
                            }
                        }
                    }
                }
            }
        }

        neighbors
    }
}
