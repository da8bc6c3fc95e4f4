//! Crystal-to-graph processing
//!
//! Per-atom featurization, metal neighborhood selection, single-sample
//! assembly, and batch collation.

pub mod collate;
pub mod features;
pub mod metal;
pub mod sample;

pub use collate::{collate, GraphBatch};
pub use features::{atom_features, ATOM_FEATURE_DIM, COORDINATION_CUTOFF};
pub use metal::{select_metal_neighborhood, MetalNeighborhood};
pub use sample::{build_sample, BuildError, GraphSample, SampleWarning, WarningKind};
