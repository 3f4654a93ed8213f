// dispatch.rs - Chunked execution of rate computation across workers

use crate::core::agreement::tiger_rate;
use crate::core::partition::Partition;
use crate::error::{Result, TigerError};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Rates computed by one chunk, keyed by character index
pub type PartialRates = BTreeMap<usize, f64>;

/// Split `0..n` into at most `workers` contiguous chunks whose sizes differ by at most one.
pub fn chunk_ranges(n: usize, workers: usize) -> Vec<Range<usize>> {
    let chunks = workers.max(1).min(n);
    if chunks == 0 {
        return Vec::new();
    }

    let base = n / chunks;
    let extra = n % chunks;
    let mut ranges = Vec::with_capacity(chunks);
    let mut start = 0;
    for i in 0..chunks {
        let len = base + usize::from(i < extra);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Shared progress reporting with reduced contention
pub struct Progress {
    bar: ProgressBar,
    counter: AtomicUsize,
    update_interval: usize,
}

impl Progress {
    pub fn new(total: usize, visible: bool) -> Self {
        let bar = if visible {
            let pb = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {per_sec} ETA: {eta}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        Self {
            bar,
            counter: AtomicUsize::new(0),
            // Update every 1%
            update_interval: std::cmp::max(1, total / 100),
        }
    }

    fn tick(&self) {
        let count = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        if count % self.update_interval == 0 {
            self.bar.set_position(count as u64);
        }
    }

    fn finish(&self) {
        self.bar.set_position(self.counter.load(Ordering::Relaxed) as u64);
        self.bar.finish_and_clear();
    }
}

/// Rates for every character index in `range`, against all partitions.
pub fn compute_chunk(range: Range<usize>, partitions: &[Partition], progress: &Progress) -> PartialRates {
    range
        .map(|site| {
            let rate = tiger_rate(site, partitions);
            progress.tick();
            (site, rate)
        })
        .collect()
}

/// A way of running chunks: in parallel on a worker pool, or one after another.
pub trait RateExecutor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Number of chunks this executor wants
    fn workers(&self) -> usize;

    /// Run every chunk, returning one partial map per chunk.
    fn execute(&self, chunks: &[Range<usize>], partitions: &[Partition], progress: &Progress) -> Vec<PartialRates>;
}

/// Runs every chunk on the calling thread
#[derive(Debug, Clone, Default)]
pub struct SequentialExecutor;

impl RateExecutor for SequentialExecutor {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn workers(&self) -> usize {
        1
    }

    fn execute(&self, chunks: &[Range<usize>], partitions: &[Partition], progress: &Progress) -> Vec<PartialRates> {
        chunks
            .iter()
            .map(|range| compute_chunk(range.clone(), partitions, progress))
            .collect()
    }
}

/// Runs chunks on a dedicated rayon pool of exactly `workers` threads
pub struct ParallelExecutor {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl ParallelExecutor {
    pub fn new(workers: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("tiger-worker-{}", i))
            .build()
            .map_err(|e| TigerError::UnsupportedPlatformForParallelism {
                requested: workers,
                reason: e.to_string(),
            })?;
        Ok(Self { pool, workers })
    }
}

impl RateExecutor for ParallelExecutor {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn execute(&self, chunks: &[Range<usize>], partitions: &[Partition], progress: &Progress) -> Vec<PartialRates> {
        self.pool.install(|| {
            chunks
                .par_iter()
                .map(|range| compute_chunk(range.clone(), partitions, progress))
                .collect()
        })
    }
}

/// Check whether this platform can run worker threads at all.
pub fn parallelism_available() -> std::result::Result<(), String> {
    if cfg!(target_family = "wasm") {
        return Err("threads are not supported on this target".to_string());
    }
    std::thread::available_parallelism()
        .map(|_| ())
        .map_err(|e| format!("cannot query available parallelism: {}", e))
}

/// Pick the executor for `requested` workers, degrading to sequential execution
/// with a warning when parallelism is unavailable.
pub fn select_executor(requested: usize) -> Box<dyn RateExecutor> {
    if requested <= 1 {
        return Box::new(SequentialExecutor);
    }

    let attempt = parallelism_available()
        .map_err(|reason| TigerError::UnsupportedPlatformForParallelism { requested, reason })
        .and_then(|_| ParallelExecutor::new(requested));

    match attempt {
        Ok(executor) => Box::new(executor),
        Err(e) => {
            warn!("⚠️  {}; falling back to sequential execution", e);
            Box::new(SequentialExecutor)
        }
    }
}

/// Fans rate computation out over chunks of characters and merges the results.
pub struct RateDispatcher {
    executor: Box<dyn RateExecutor>,
    show_progress: bool,
}

impl RateDispatcher {
    pub fn new(workers: usize) -> Self {
        Self::with_executor(select_executor(workers))
    }

    pub fn with_executor(executor: Box<dyn RateExecutor>) -> Self {
        Self {
            executor,
            show_progress: false,
        }
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn executor_name(&self) -> &'static str {
        self.executor.name()
    }

    /// Rates for all characters, ordered by character index.
    pub fn compute(&self, partitions: &[Partition]) -> Result<Vec<f64>> {
        let n = partitions.len();
        if n < 2 {
            return Err(TigerError::TooFewCharacters { found: n });
        }

        let chunks = chunk_ranges(n, self.executor.workers());
        info!(
            "🔄 Computing rates for {} characters ({} executor, {} chunks)",
            n,
            self.executor.name(),
            chunks.len()
        );
        debug!(?chunks, "chunk layout");

        let start = Instant::now();
        let progress = Progress::new(n, self.show_progress);
        let partials = self.executor.execute(&chunks, partitions, &progress);
        progress.finish();

        let rates = merge_partials(n, partials)?;
        info!("✅ Rates computed in {:.2}s", start.elapsed().as_secs_f64());
        Ok(rates)
    }
}

/// Merge partial maps into one vector indexed by character.
pub fn merge_partials(n: usize, partials: Vec<PartialRates>) -> Result<Vec<f64>> {
    let mut merged: Vec<Option<f64>> = vec![None; n];
    for (site, rate) in partials.into_iter().flatten() {
        match merged.get_mut(site) {
            Some(slot) if slot.is_none() => *slot = Some(rate),
            Some(_) => {
                return Err(TigerError::WorkerFailed(format!(
                    "character {} was computed by more than one chunk",
                    site + 1
                )))
            }
            None => {
                return Err(TigerError::WorkerFailed(format!(
                    "character index {} is out of range",
                    site
                )))
            }
        }
    }

    merged
        .into_iter()
        .enumerate()
        .map(|(site, rate)| {
            rate.ok_or_else(|| TigerError::WorkerFailed(format!("no rate produced for character {}", site + 1)))
        })
        .collect()
}
