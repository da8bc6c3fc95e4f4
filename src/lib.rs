//! Graphitize
//!
//! Turns crystal structures into the graph tensors consumed by
//! property-prediction GNNs: within-radius neighbor lists, per-atom
//! features, a metal-anchored primary index set, Gaussian radial-basis
//! edge features, and offset-corrected batches.
//!
//! The typical entry point is [`GraphDataset`], which wires a property
//! table and a [`StructureProvider`] to the per-crystal builder and an
//! LRU sample cache. [`build_sample`] and [`collate`] are usable on
//! their own for hosts that manage structures themselves.

pub mod chem;
pub mod config;
pub mod dataset;
pub mod geometry;
pub mod processing;
pub mod structure;

#[cfg(feature = "python")]
mod py_bindings;

pub use config::{GraphConfig, TaskMode};
pub use dataset::{BuiltSample, GraphDataset, PropertyRow, PropertyTable, SampleCache};
pub use geometry::{FilterError, GaussianFilter};
pub use processing::{
    build_sample, collate, BuildError, GraphBatch, GraphSample, SampleWarning, WarningKind,
};
pub use structure::{
    CrystalStructure, Lattice, MemoryProvider, StructureError, StructureProvider,
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module
#[cfg(feature = "python")]
#[pymodule]
fn _graphitize(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_function(wrap_pyfunction!(py_bindings::build_crystal_graph, m)?)?;
    m.add_function(wrap_pyfunction!(py_bindings::expand_distances, m)?)?;

    Ok(())
}
