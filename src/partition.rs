//! Splitting the outermost search level across a worker pool.
//!
//! Only the first index of a combination is partitioned; each worker walks
//! the full depth below its roots. Workers own their sinks and the results
//! are merged once, after every worker has returned.

use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::search::{Collector, Counter, SearchParams, Searcher, Sink};

/// How outer indices are grouped into units of work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// `workers` contiguous chunks of near-equal size.
    #[default]
    Chunked,
    /// One unit per entry of the rarest rarity bucket, the remaining
    /// indices chunked as above.
    RarityBuckets,
}

/// Outer indices finished so far, for display only.
#[derive(Debug, Default)]
pub struct Progress {
    processed: AtomicUsize,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }

    fn advance(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Split `range` into at most `parts` contiguous, non-empty pieces whose
/// lengths differ by at most one.
pub fn chunks(range: Range<usize>, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    let len = range.len();
    (0..parts)
        .map(|i| range.start + i * len / parts..range.start + (i + 1) * len / parts)
        .filter(|r| !r.is_empty())
        .collect()
}

/// Units of work covering `0..catalog.len()` exactly once, in index order.
pub fn plan(catalog: &Catalog, workers: usize, strategy: Strategy) -> Vec<Range<usize>> {
    match strategy {
        Strategy::Chunked => chunks(0..catalog.len(), workers),
        Strategy::RarityBuckets => {
            let Some((score, rarest)) = catalog.rarity_buckets().into_iter().next() else {
                return Vec::new();
            };
            debug!(score, roots = rarest.len(), "rooting one unit per rarest entry");
            let rest = rarest.end..catalog.len();
            rarest
                .map(|i| i..i + 1)
                .chain(chunks(rest, workers))
                .collect()
        }
    }
}

/// Runs searches over a catalog on a dedicated pool.
#[derive(Debug, Clone, Copy)]
pub struct Partitioner {
    workers: usize,
    strategy: Strategy,
}

impl Partitioner {
    pub fn new(workers: usize, strategy: Strategy) -> Self {
        Self { workers, strategy }
    }

    pub fn count(
        &self,
        catalog: &Catalog,
        params: SearchParams,
        progress: Option<&Progress>,
    ) -> Result<u64> {
        let counter = self.run(catalog, params, progress, |a: Counter, b: Counter| Counter {
            count: a.count + b.count,
        })?;
        Ok(counter.count)
    }

    pub fn collect(
        &self,
        catalog: &Catalog,
        params: SearchParams,
        progress: Option<&Progress>,
    ) -> Result<Vec<Vec<usize>>> {
        let collector = self.run(catalog, params, progress, |mut a: Collector, b: Collector| {
            a.tuples.extend(b.tuples);
            a
        })?;
        Ok(collector.tuples)
    }

    fn run<S, M>(
        &self,
        catalog: &Catalog,
        params: SearchParams,
        progress: Option<&Progress>,
        merge: M,
    ) -> Result<S>
    where
        S: Sink + Default + Send,
        M: Fn(S, S) -> S,
    {
        let searcher = Searcher::new(catalog, params);
        if !searcher.is_searchable() {
            info!(
                entries = searcher.len(),
                combo_size = params.combo_size,
                "catalog smaller than one combination, skipping search"
            );
            return Ok(S::default());
        }

        let workers = self.workers.clamp(1, catalog.len());
        let units = plan(catalog, workers, self.strategy);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("search-{i}"))
            .build()?;
        info!(workers, units = units.len(), strategy = ?self.strategy, "starting search");

        let start = Instant::now();
        let partials: Vec<S> = panic::catch_unwind(AssertUnwindSafe(|| {
            pool.install(|| {
                units
                    .par_iter()
                    .map(|unit| {
                        let mut sink = S::default();
                        for first in unit.clone() {
                            searcher.visit_root(first, &mut sink);
                            if let Some(progress) = progress {
                                progress.advance();
                            }
                        }
                        sink
                    })
                    .collect()
            })
        }))
        .map_err(|payload| Error::WorkerPanicked(panic_message(payload.as_ref())))?;

        let merged = partials.into_iter().fold(S::default(), merge);
        info!(elapsed = ?start.elapsed(), "search finished");
        Ok(merged)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
