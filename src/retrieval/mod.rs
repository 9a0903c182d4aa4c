//! Nearest-neighbor retrieval over a signature store.
//!
//! Every query is a linear scan: the query signature is compared with each
//! store entry under each requested metric. Two selection modes exist.
//! [`QueryMode::TopK`] keeps the k smallest distances, ordering equal
//! distances by store position. [`QueryMode::RunningMinimum`] tracks only the
//! best entry per metric in one pass and answers k = 1; both modes agree on
//! that answer. With the `rayon` feature and `parallel` set, metrics are
//! evaluated concurrently over the shared, read-only store.

mod topk;

use crate::descriptor::Signature;
use crate::metric::Metric;
use crate::store::SignatureStore;
use crate::trace::{trace_event, trace_span};
use crate::util::{TexSearchError, TexSearchResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use topk::{Ranked, TopK};

/// One ranked match.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceResult {
    /// Metric used to rank the match.
    pub metric: Metric,
    /// Identifier (path) of the matched store entry.
    pub path: PathBuf,
    /// Position of the matched entry in the store.
    pub index: usize,
    /// Distance from the query.
    pub distance: f64,
}

/// Ranked matches per metric.
pub type QueryResults = BTreeMap<Metric, Vec<DistanceResult>>;

/// Selection strategy for a query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueryMode {
    /// Keep the k smallest distances.
    #[default]
    TopK,
    /// Track the single best entry per metric; only meaningful for k = 1,
    /// larger k falls back to `TopK`.
    RunningMinimum,
}

/// Query parameters.
#[derive(Clone, Debug)]
pub struct QueryConfig {
    /// Metrics to rank with; duplicates are ignored.
    pub metrics: Vec<Metric>,
    /// Maximum number of matches per metric.
    pub k: usize,
    /// Selection strategy.
    pub mode: QueryMode,
    /// Evaluate metrics concurrently when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            metrics: Metric::ALL.to_vec(),
            k: 5,
            mode: QueryMode::TopK,
            parallel: false,
        }
    }
}

/// Read-only query engine bound to one store.
#[derive(Clone, Copy, Debug)]
pub struct RetrievalEngine<'a> {
    store: &'a SignatureStore,
}

impl<'a> RetrievalEngine<'a> {
    /// Creates an engine over `store`.
    pub fn new(store: &'a SignatureStore) -> Self {
        Self { store }
    }

    /// Returns the store being queried.
    pub fn store(&self) -> &'a SignatureStore {
        self.store
    }

    /// Ranks store entries against `signature` for each requested metric.
    pub fn query(&self, signature: &Signature, cfg: &QueryConfig) -> TexSearchResult<QueryResults> {
        self.check_query(signature)?;
        if cfg.k == 0 {
            return Err(TexSearchError::InvalidInput("k must be at least 1"));
        }
        if cfg.metrics.is_empty() {
            return Err(TexSearchError::InvalidInput("at least one metric is required"));
        }
        let mut metrics = cfg.metrics.clone();
        metrics.sort();
        metrics.dedup();

        let _span = trace_span!(
            "query",
            entries = self.store.len(),
            metrics = metrics.len(),
            k = cfg.k
        )
        .entered();

        let rank = |metric: &Metric| (*metric, self.rank_metric(signature, *metric, cfg));

        #[cfg(feature = "rayon")]
        let ranked: Vec<(Metric, Vec<DistanceResult>)> = if cfg.parallel {
            metrics.par_iter().map(rank).collect()
        } else {
            metrics.iter().map(rank).collect()
        };
        #[cfg(not(feature = "rayon"))]
        let ranked: Vec<(Metric, Vec<DistanceResult>)> = metrics.iter().map(rank).collect();

        trace_event!("query_done", metrics = ranked.len());
        Ok(ranked.into_iter().collect())
    }

    /// Returns the single best match for each of the four metrics.
    ///
    /// One pass over the store updates a running minimum per metric; on
    /// equal distances the earlier entry is kept.
    pub fn best_matches(
        &self,
        signature: &Signature,
    ) -> TexSearchResult<BTreeMap<Metric, DistanceResult>> {
        self.check_query(signature)?;
        let query = signature.as_slice();
        let mut best = [(f64::INFINITY, None::<usize>); Metric::ALL.len()];
        for (index, entry) in self.store.entries().iter().enumerate() {
            let candidate = entry.signature.as_slice();
            for (slot, metric) in best.iter_mut().zip(Metric::ALL) {
                let distance = metric.distance_unchecked(query, candidate);
                if slot.1.is_none() || distance < slot.0 {
                    *slot = (distance, Some(index));
                }
            }
        }
        let mut out = BTreeMap::new();
        for ((distance, index), metric) in best.into_iter().zip(Metric::ALL) {
            if let Some(index) = index {
                out.insert(metric, self.result(metric, index, distance));
            }
        }
        Ok(out)
    }

    fn check_query(&self, signature: &Signature) -> TexSearchResult<()> {
        let expected = self.store.dimension().ok_or(TexSearchError::EmptyStore)?;
        if signature.len() != expected {
            return Err(TexSearchError::DimensionMismatch {
                expected,
                got: signature.len(),
            });
        }
        if !signature.is_finite() {
            return Err(TexSearchError::InvalidInput(
                "query signature contains non-finite values",
            ));
        }
        Ok(())
    }

    fn rank_metric(
        &self,
        signature: &Signature,
        metric: Metric,
        cfg: &QueryConfig,
    ) -> Vec<DistanceResult> {
        let query = signature.as_slice();
        let distances = self
            .store
            .signatures()
            .map(|candidate| metric.distance_unchecked(query, candidate.as_slice()));

        if cfg.mode == QueryMode::RunningMinimum && cfg.k == 1 {
            let mut best: Option<Ranked> = None;
            for (index, distance) in distances.enumerate() {
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(Ranked { distance, index });
                }
            }
            return best
                .map(|b| vec![self.result(metric, b.index, b.distance)])
                .unwrap_or_default();
        }

        let mut topk = TopK::new(cfg.k);
        for (index, distance) in distances.enumerate() {
            topk.push(Ranked { distance, index });
        }
        topk.into_sorted_asc()
            .into_iter()
            .map(|r| self.result(metric, r.index, r.distance))
            .collect()
    }

    fn result(&self, metric: Metric, index: usize, distance: f64) -> DistanceResult {
        let path = self
            .store
            .get(index)
            .map(|e| e.path.clone())
            .unwrap_or_default();
        DistanceResult {
            metric,
            path,
            index,
            distance,
        }
    }
}

/// Ranks `store` against `signature` with every metric in `metrics`.
pub fn query(
    signature: &Signature,
    store: &SignatureStore,
    metrics: &[Metric],
    k: usize,
) -> TexSearchResult<QueryResults> {
    let cfg = QueryConfig {
        metrics: metrics.to_vec(),
        k,
        ..QueryConfig::default()
    };
    RetrievalEngine::new(store).query(signature, &cfg)
}
