//! Dataset orchestration
//!
//! Resolves crystal identifiers through the property table, loads structures
//! via a [`StructureProvider`], builds graph samples (memoized in a bounded
//! LRU cache) and collates them into batches. Construction is pure per
//! identifier, so `get_many` fans out across a rayon pool.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{GraphConfig, TaskMode};
use crate::geometry::radial_basis::GaussianFilter;
use crate::processing::collate::{collate, GraphBatch};
use crate::processing::sample::{build_sample, BuildError, GraphSample, SampleWarning};
use crate::structure::StructureProvider;

pub mod atom_init;
pub mod cache;

pub use atom_init::{load_atom_init, parse_atom_init, AtomInitError};
pub use cache::SampleCache;

/// One row of the property table: identifier, auxiliary scalar features,
/// target value(s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRow {
    pub id: String,
    pub aux: Vec<f64>,
    pub targets: Vec<f64>,
}

/// The property table keyed by crystal identifier. Row layout follows the
/// on-disk convention: first column identifier, last column target value(s),
/// middle columns auxiliary scalar features.
#[derive(Debug, Clone)]
pub struct PropertyTable {
    rows: Vec<PropertyRow>,
    index: HashMap<String, usize>,
    aux_dim: usize,
    target_dim: usize,
}

impl PropertyTable {
    /// Build from pre-parsed rows. All rows must agree on auxiliary and
    /// target dimensionality, and identifiers must be unique.
    pub fn new(rows: Vec<PropertyRow>) -> Result<Self, BuildError> {
        let aux_dim = rows.first().map_or(0, |r| r.aux.len());
        let target_dim = rows.first().map_or(0, |r| r.targets.len());
        let mut index = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.aux.len() != aux_dim || row.targets.len() != target_dim {
                return Err(BuildError::BadRecord {
                    id: row.id.clone(),
                    reason: format!(
                        "row dims ({}, {}) differ from table dims ({}, {})",
                        row.aux.len(),
                        row.targets.len(),
                        aux_dim,
                        target_dim
                    ),
                });
            }
            if index.insert(row.id.clone(), i).is_some() {
                return Err(BuildError::BadRecord {
                    id: row.id.clone(),
                    reason: "duplicate identifier".to_string(),
                });
            }
        }
        Ok(Self {
            rows,
            index,
            aux_dim,
            target_dim,
        })
    }

    /// Parse string records. In [`TaskMode::Train`] the last field may carry
    /// several whitespace-separated target values; in [`TaskMode::Predict`]
    /// it carries exactly one.
    pub fn from_records(records: &[Vec<String>], mode: TaskMode) -> Result<Self, BuildError> {
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            if record.len() < 2 {
                return Err(BuildError::BadRecord {
                    id: record.first().cloned().unwrap_or_default(),
                    reason: "record needs at least an identifier and a target field".to_string(),
                });
            }
            let id = record[0].clone();
            let bad = |reason: String| BuildError::BadRecord {
                id: id.clone(),
                reason,
            };

            let aux = record[1..record.len() - 1]
                .iter()
                .map(|f| {
                    f.parse::<f64>()
                        .map_err(|_| bad(format!("non-numeric auxiliary field {:?}", f)))
                })
                .collect::<Result<Vec<_>, _>>()?;

            let last = &record[record.len() - 1];
            let targets = match mode {
                TaskMode::Train => {
                    let values = last
                        .split_whitespace()
                        .map(|t| {
                            t.parse::<f64>()
                                .map_err(|_| bad(format!("non-numeric target {:?}", t)))
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    if values.is_empty() {
                        return Err(bad("empty target field".to_string()));
                    }
                    values
                }
                TaskMode::Predict => vec![last
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| bad(format!("non-numeric target {:?}", last)))?],
            };

            rows.push(PropertyRow { id, aux, targets });
        }
        Self::new(rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, idx: usize) -> Option<&PropertyRow> {
        self.rows.get(idx)
    }

    pub fn get(&self, id: &str) -> Option<&PropertyRow> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    pub fn aux_dim(&self) -> usize {
        self.aux_dim
    }

    pub fn target_dim(&self) -> usize {
        self.target_dim
    }
}

/// A built sample together with the warnings its construction produced.
/// Samples are `Arc`-shared between the cache and callers.
#[derive(Debug, Clone)]
pub struct BuiltSample {
    pub sample: Arc<GraphSample>,
    pub warnings: Vec<SampleWarning>,
}

/// A dataset of crystal graphs over a property table and structure source.
pub struct GraphDataset<P: StructureProvider> {
    table: PropertyTable,
    provider: P,
    config: GraphConfig,
    filter: GaussianFilter,
    cache: Mutex<SampleCache>,
}

impl<P: StructureProvider> GraphDataset<P> {
    /// Validates the Gaussian filter bounds up front, before any sample is
    /// built.
    pub fn new(table: PropertyTable, provider: P, config: GraphConfig) -> Result<Self, BuildError> {
        let filter = config.filter()?;
        let cache = Mutex::new(SampleCache::new(config.cache_capacity));
        Ok(Self {
            table,
            provider,
            config,
            filter,
            cache,
        })
    }

    /// Parse string records with the configured task mode, then construct.
    pub fn from_records(
        records: &[Vec<String>],
        provider: P,
        config: GraphConfig,
    ) -> Result<Self, BuildError> {
        let table = PropertyTable::from_records(records, config.mode)?;
        Self::new(table, provider, config)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn table(&self) -> &PropertyTable {
        &self.table
    }

    /// Build (or fetch from cache) the sample at a table position.
    pub fn get(&self, idx: usize) -> Result<BuiltSample, BuildError> {
        let row = self
            .table
            .row(idx)
            .ok_or(BuildError::IndexOutOfRange(idx))?;
        self.build_row(row)
    }

    /// Build (or fetch from cache) the sample for an identifier.
    pub fn get_by_id(&self, id: &str) -> Result<BuiltSample, BuildError> {
        let row = self
            .table
            .get(id)
            .ok_or_else(|| BuildError::UnknownId(id.to_string()))?;
        self.build_row(row)
    }

    /// Build many samples in parallel. Fails on the first error, since a
    /// fatal condition in any structure invalidates the run.
    pub fn get_many(&self, indices: &[usize]) -> Result<Vec<BuiltSample>, BuildError> {
        indices.par_iter().map(|&i| self.get(i)).collect()
    }

    /// Build the samples at `indices` and collate them into one batch,
    /// merging their warnings.
    pub fn get_batch(
        &self,
        indices: &[usize],
    ) -> Result<(GraphBatch, Vec<SampleWarning>), BuildError> {
        let built = self.get_many(indices)?;
        let samples: Vec<Arc<GraphSample>> = built.iter().map(|b| b.sample.clone()).collect();
        let warnings = built.into_iter().flat_map(|b| b.warnings).collect();
        Ok((collate(&samples), warnings))
    }

    /// Deterministically shuffled table positions for epoch iteration.
    pub fn shuffled_indices(&self, seed: u64) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(&mut rand::rngs::StdRng::seed_from_u64(seed));
        indices
    }

    fn build_row(&self, row: &PropertyRow) -> Result<BuiltSample, BuildError> {
        // The lock is never held across construction; a concurrent miss on
        // the same identifier may build twice, with identical results.
        if let Some(hit) = self.cache.lock().unwrap().get(&row.id) {
            log::debug!("cache hit for {}", row.id);
            return Ok(hit);
        }

        let structure = self.provider.load_structure(&row.id)?;
        let (sample, warnings) = build_sample(
            &structure,
            &row.id,
            &row.aux,
            &row.targets,
            &self.config,
            &self.filter,
        )?;
        let built = BuiltSample {
            sample: Arc::new(sample),
            warnings,
        };
        self.cache
            .lock()
            .unwrap()
            .insert(row.id.clone(), built.clone());
        Ok(built)
    }
}
