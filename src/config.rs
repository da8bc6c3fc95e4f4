//! Graph-construction configuration
//!
//! One plain struct carries every tunable of the pipeline, with the
//! documented defaults. The Gaussian filter spans `[dmin, radius]` so padded
//! distances of `radius + 1.0` land past the last center and expand to
//! near-zero weight.

use crate::geometry::radial_basis::{FilterError, GaussianFilter};

/// How target values are sourced from the property table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskMode {
    /// Training rows carry one or more target values in the last field.
    #[default]
    Train,
    /// Prediction rows carry exactly one target value in the last field.
    Predict,
}

/// Configuration for building crystal graphs.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Neighbor slots per atom in the main graph.
    pub max_num_nbr: usize,
    /// Cutoff radius for the main neighbor search (also the filter dmax).
    pub radius: f64,
    /// Neighbor slots per metal atom in the extended neighborhood.
    pub metal_max_num_nbr: usize,
    /// Cutoff radius for the metal neighbor search, typically larger.
    pub metal_radius: f64,
    /// First Gaussian filter center.
    pub dmin: f64,
    /// Spacing between Gaussian filter centers.
    pub step: f64,
    /// Gaussian variance; defaults to `step` when unset.
    pub variance: Option<f64>,
    /// Target sourcing mode.
    pub mode: TaskMode,
    /// Capacity of the built-sample LRU cache; 0 disables caching.
    pub cache_capacity: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_num_nbr: 10,
            radius: 6.0,
            metal_max_num_nbr: 16,
            metal_radius: 8.0,
            dmin: 0.0,
            step: 0.2,
            variance: None,
            mode: TaskMode::Train,
            cache_capacity: 128,
        }
    }
}

impl GraphConfig {
    /// Build the distance expander implied by this configuration.
    /// Fails before any sample is built if the bounds are invalid.
    pub fn filter(&self) -> Result<GaussianFilter, FilterError> {
        GaussianFilter::new(self.dmin, self.radius, self.step, self.variance)
    }
}
