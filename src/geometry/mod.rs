//! Geometric primitives for graph construction
//!
//! Distance helpers, spatial hashing, within-radius neighbor search
//! (periodic and aperiodic), and Gaussian radial-basis expansion.

pub mod cell_list;
pub mod distances;
pub mod neighbors;
pub mod radial_basis;

pub use neighbors::{all_neighbors, site_neighbors, Neighbor};
pub use radial_basis::{FilterError, GaussianFilter};
