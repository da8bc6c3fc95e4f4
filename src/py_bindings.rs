//! Python bindings
//!
//! Thin numpy-facing wrappers over the crate core. Errors surface as
//! `ValueError`; construction warnings come back as plain strings so the
//! host can route them to its own logging.

use numpy::PyArray1;
use numpy::PyArrayMethods;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::config::GraphConfig;
use crate::geometry::GaussianFilter;
use crate::processing::build_sample;
use crate::structure::{CrystalStructure, Lattice};

/// Build the graph tensors for one crystal.
///
/// Returns a dict with `atom_fea (n_atoms, 2)`, `nbr_fea (n_atoms,
/// max_num_nbr, n_filters)`, `nbr_fea_idx (n_atoms, max_num_nbr)`,
/// `primary_idx`, `aux`, `target` and a `warnings` list of strings.
#[pyfunction]
#[pyo3(signature = (
    numbers, positions, id, lattice=None, aux=Vec::new(), target=Vec::new(),
    max_num_nbr=10, radius=6.0, metal_max_num_nbr=16, metal_radius=8.0,
    dmin=0.0, step=0.2, variance=None
))]
#[allow(clippy::too_many_arguments)]
pub fn build_crystal_graph(
    numbers: Vec<u8>,
    positions: Vec<[f64; 3]>,
    id: String,
    lattice: Option<[[f64; 3]; 3]>,
    aux: Vec<f64>,
    target: Vec<f64>,
    max_num_nbr: usize,
    radius: f64,
    metal_max_num_nbr: usize,
    metal_radius: f64,
    dmin: f64,
    step: f64,
    variance: Option<f64>,
) -> PyResult<PyObject> {
    Python::with_gil(|py| {
        let lattice = lattice
            .map(Lattice::new)
            .transpose()
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
        let structure = CrystalStructure::new(numbers, positions, lattice)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;

        let config = GraphConfig {
            max_num_nbr,
            radius,
            metal_max_num_nbr,
            metal_radius,
            dmin,
            step,
            variance,
            ..GraphConfig::default()
        };
        let filter = config.filter().map_err(|e| {
            pyo3::exceptions::PyValueError::new_err(format!("invalid filter bounds: {}", e))
        })?;

        let (sample, warnings) = build_sample(&structure, &id, &aux, &target, &config, &filter)
            .map_err(|e| {
                pyo3::exceptions::PyValueError::new_err(format!("graph construction failed: {}", e))
            })?;

        let dict = PyDict::new_bound(py);
        dict.set_item("id", &sample.id)?;
        dict.set_item("n_atoms", sample.n_atoms)?;

        let atom_fea = PyArray1::from_slice_bound(py, &sample.atom_features)
            .reshape((sample.n_atoms, 2))
            .map_err(|e| {
                pyo3::exceptions::PyValueError::new_err(format!("reshape failed: {}", e))
            })?;
        dict.set_item("atom_fea", atom_fea)?;

        let nbr_fea = PyArray1::from_slice_bound(py, &sample.nbr_features)
            .reshape((sample.n_atoms, sample.max_num_nbr, sample.basis_len))
            .map_err(|e| {
                pyo3::exceptions::PyValueError::new_err(format!("reshape failed: {}", e))
            })?;
        dict.set_item("nbr_fea", nbr_fea)?;

        let nbr_fea_idx = PyArray1::from_slice_bound(py, &sample.nbr_indices)
            .reshape((sample.n_atoms, sample.max_num_nbr))
            .map_err(|e| {
                pyo3::exceptions::PyValueError::new_err(format!("reshape failed: {}", e))
            })?;
        dict.set_item("nbr_fea_idx", nbr_fea_idx)?;

        dict.set_item(
            "primary_idx",
            PyArray1::from_slice_bound(py, &sample.primary_indices),
        )?;
        dict.set_item("aux", PyArray1::from_slice_bound(py, &sample.aux_features))?;
        dict.set_item("target", PyArray1::from_slice_bound(py, &sample.target))?;

        let messages: Vec<String> = warnings.iter().map(|w| w.to_string()).collect();
        dict.set_item("warnings", messages)?;

        Ok(dict.into_py(py))
    })
}

/// Expand raw distances with a Gaussian filter, shape `(len, n_filters)`.
#[pyfunction]
#[pyo3(signature = (distances, dmin=0.0, dmax=6.0, step=0.2, variance=None))]
pub fn expand_distances(
    distances: Vec<f64>,
    dmin: f64,
    dmax: f64,
    step: f64,
    variance: Option<f64>,
) -> PyResult<PyObject> {
    Python::with_gil(|py| {
        let filter = GaussianFilter::new(dmin, dmax, step, variance).map_err(|e| {
            pyo3::exceptions::PyValueError::new_err(format!("invalid filter bounds: {}", e))
        })?;
        let expanded = filter.expand(&distances);
        let array = PyArray1::from_vec_bound(py, expanded)
            .reshape((distances.len(), filter.len()))
            .map_err(|e| {
                pyo3::exceptions::PyValueError::new_err(format!("reshape failed: {}", e))
            })?;
        Ok(array.into_py(py))
    })
}
