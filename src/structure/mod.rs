//! Crystal structure data model
//!
//! Defines the read-only atomic-structure representation consumed by graph
//! construction: atomic numbers and cartesian positions as parallel arrays,
//! plus an optional periodic lattice. Structures are immutable once built.

use nalgebra::{Matrix3, Vector3};
use thiserror::Error;

use crate::chem;

pub mod provider;

pub use provider::{MemoryProvider, StructureProvider};

#[derive(Error, Debug)]
pub enum StructureError {
    #[error("unknown element symbol: {0}")]
    UnknownElement(String),
    #[error("expected {expected} positions, got {got}")]
    MismatchedLengths { expected: usize, got: usize },
    #[error("lattice matrix is singular")]
    SingularLattice,
    #[error("no structure found for identifier {0}")]
    NotFound(String),
    #[error("failed to parse structure: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Periodic cell. Rows of the matrix are the lattice vectors a, b, c.
#[derive(Debug, Clone)]
pub struct Lattice {
    matrix: Matrix3<f64>,
    inverse: Matrix3<f64>,
}

impl Lattice {
    /// Build a lattice from three row vectors. Rejects singular cells.
    pub fn new(rows: [[f64; 3]; 3]) -> Result<Self, StructureError> {
        let matrix = Matrix3::new(
            rows[0][0], rows[0][1], rows[0][2],
            rows[1][0], rows[1][1], rows[1][2],
            rows[2][0], rows[2][1], rows[2][2],
        );
        let inverse = matrix
            .try_inverse()
            .ok_or(StructureError::SingularLattice)?;
        Ok(Self { matrix, inverse })
    }

    /// Cubic cell with edge length `a`.
    pub fn cubic(a: f64) -> Result<Self, StructureError> {
        Self::new([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Fractional coordinates to cartesian: `cart = frac * M` (row vector).
    pub fn to_cartesian(&self, frac: [f64; 3]) -> [f64; 3] {
        let v = Vector3::from(frac).transpose() * self.matrix;
        [v[0], v[1], v[2]]
    }

    /// Cartesian coordinates to fractional.
    pub fn to_fractional(&self, cart: [f64; 3]) -> [f64; 3] {
        let v = Vector3::from(cart).transpose() * self.inverse;
        [v[0], v[1], v[2]]
    }

    /// Cartesian translation for the periodic image (i, j, k).
    pub fn image_translation(&self, image: [i32; 3]) -> Vector3<f64> {
        (Vector3::new(image[0] as f64, image[1] as f64, image[2] as f64).transpose()
            * self.matrix)
            .transpose()
    }

    /// Number of periodic images needed along each axis so that every point
    /// within `radius` of the home cell is covered. The spacing between
    /// lattice planes along axis i is `1 / ||column_i(M^-1)||`.
    pub fn images_for_radius(&self, radius: f64) -> [i32; 3] {
        let mut out = [0i32; 3];
        for (i, slot) in out.iter_mut().enumerate() {
            let recip_len = self.inverse.column(i).norm();
            *slot = (radius * recip_len).ceil() as i32;
        }
        out
    }
}

/// An ordered collection of atoms, optionally periodic. Read-only to the
/// graph-construction core.
#[derive(Debug, Clone)]
pub struct CrystalStructure {
    numbers: Vec<u8>,
    positions: Vec<[f64; 3]>,
    lattice: Option<Lattice>,
}

impl CrystalStructure {
    /// Build from atomic numbers and cartesian positions.
    pub fn new(
        numbers: Vec<u8>,
        positions: Vec<[f64; 3]>,
        lattice: Option<Lattice>,
    ) -> Result<Self, StructureError> {
        if numbers.len() != positions.len() {
            return Err(StructureError::MismatchedLengths {
                expected: numbers.len(),
                got: positions.len(),
            });
        }
        Ok(Self {
            numbers,
            positions,
            lattice,
        })
    }

    /// Build from element symbols and cartesian positions.
    pub fn from_symbols(
        symbols: &[&str],
        positions: Vec<[f64; 3]>,
        lattice: Option<Lattice>,
    ) -> Result<Self, StructureError> {
        let numbers = symbols
            .iter()
            .map(|&s| chem::atomic_number(s).ok_or_else(|| StructureError::UnknownElement(s.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(numbers, positions, lattice)
    }

    /// Build a periodic structure from fractional coordinates.
    pub fn from_fractional(
        numbers: Vec<u8>,
        fractional: Vec<[f64; 3]>,
        lattice: Lattice,
    ) -> Result<Self, StructureError> {
        let positions = fractional
            .iter()
            .map(|&f| lattice.to_cartesian(f))
            .collect();
        Self::new(numbers, positions, Some(lattice))
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn atomic_number(&self, i: usize) -> u8 {
        self.numbers[i]
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn position(&self, i: usize) -> [f64; 3] {
        self.positions[i]
    }

    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }

    pub fn lattice(&self) -> Option<&Lattice> {
        self.lattice.as_ref()
    }

    pub fn is_metal(&self, i: usize) -> bool {
        chem::is_metal(self.numbers[i])
    }

    /// Indices of all metal atoms, in atom order.
    pub fn metal_indices(&self) -> Vec<usize> {
        self.numbers
            .iter()
            .enumerate()
            .filter(|(_, &z)| chem::is_metal(z))
            .map(|(i, _)| i)
            .collect()
    }
}
