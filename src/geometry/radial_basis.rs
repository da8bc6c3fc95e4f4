//! Gaussian radial-basis expansion of bond distances
//!
//! Maps a scalar distance to a vector of Gaussian-weighted channels centered
//! at fixed reference distances, so the network sees a smooth distance
//! encoding instead of a raw scalar.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("invalid Gaussian filter bounds: dmin={dmin}, dmax={dmax}, step={step} (need step > 0, dmin < dmax and dmax - dmin > step)")]
    InvalidBounds { dmin: f64, dmax: f64, step: f64 },
}

/// Fixed bank of Gaussian filters. Stateless after construction and
/// shareable immutably across worker threads.
#[derive(Debug, Clone)]
pub struct GaussianFilter {
    centers: Vec<f64>,
    var: f64,
}

impl GaussianFilter {
    /// Build a filter bank with centers `dmin, dmin+step, ...` spanning at
    /// least `dmax`; when the span is not a multiple of `step` the last
    /// center lands just past `dmax`. `variance` defaults to `step` when
    /// unset.
    ///
    /// Rejects non-positive `step`, `dmin >= dmax` and spans not larger
    /// than `step`.
    pub fn new(
        dmin: f64,
        dmax: f64,
        step: f64,
        variance: Option<f64>,
    ) -> Result<Self, FilterError> {
        if step <= 0.0 || !(dmin < dmax) || dmax - dmin <= step {
            return Err(FilterError::InvalidBounds { dmin, dmax, step });
        }
        // Inclusive endpoint: arange(dmin, dmax + step, step) counting
        let n = ((dmax + step - dmin) / step - 1e-9).ceil() as usize;
        let centers = (0..n).map(|k| dmin + k as f64 * step).collect();
        Ok(Self {
            centers,
            var: variance.unwrap_or(step),
        })
    }

    /// Number of radial-basis channels.
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Expand one distance into `len()` channels:
    /// `out[k] = exp(-(d - centers[k])^2 / var^2)`.
    pub fn expand_into(&self, distance: f64, out: &mut [f32]) {
        let var_sq = self.var * self.var;
        for (slot, &center) in out.iter_mut().zip(self.centers.iter()) {
            let diff = distance - center;
            *slot = (-diff * diff / var_sq).exp() as f32;
        }
    }

    /// Expand a distance slice element-wise into a flattened
    /// `(distances.len(), len())` row-major tensor.
    pub fn expand(&self, distances: &[f64]) -> Vec<f32> {
        let k = self.len();
        let mut out = vec![0.0f32; distances.len() * k];
        for (i, &d) in distances.iter().enumerate() {
            self.expand_into(d, &mut out[i * k..(i + 1) * k]);
        }
        out
    }
}
