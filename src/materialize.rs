//! Bulk conversion of a whole column in one pass.
//!
//! The row range is split into contiguous, non-overlapping pieces, one per
//! worker. Every worker gets a freshly constructed [`TemporalParser`] and a
//! disjoint sub-slice of the output buffer, so there is nothing to merge and
//! nothing to lock; the finished buffer is identical whatever the worker
//! count or scheduling order.

use std::sync::OnceLock;

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::warn;

use crate::error::{ChronovecError, Result};
use crate::parse::{CellValue, FormatSpec, TemporalKind, TemporalParser};
use crate::settings::EngineSettings;
use crate::source::RawColumnView;

/// Rayon normally uses a global thread pool, and a failure to initialize it
/// panics on first use. We build a crate-local pool instead and fall back to
/// sequential execution when even that cannot be created.
static WORKER_POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();

fn pool_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn build_worker_pool() -> Option<ThreadPool> {
    let requested = pool_threads().max(1);
    let try_build = |n| rayon::ThreadPoolBuilder::new().num_threads(n).build();

    match try_build(requested) {
        Ok(pool) => Some(pool),
        Err(_) if requested > 1 => try_build(1).ok(),
        Err(_) => None,
    }
}

fn worker_pool() -> Option<&'static ThreadPool> {
    WORKER_POOL.get_or_init(build_worker_pool).as_ref()
}

/// One bulk conversion: partitioning, worker-owned parsers, a write-once
/// output buffer.
pub struct Materializer {
    workers: usize,
    parallel: bool,
}

impl Materializer {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            workers: settings.workers.max(1),
            parallel: settings.parallel,
        }
    }

    /// Parse every cell of `source` once and return the filled buffer.
    ///
    /// The buffer is allocated up front; a failed allocation is reported and
    /// leaves the caller free to retry later.
    pub fn run(
        &self,
        source: &dyn RawColumnView,
        format: &FormatSpec,
        kind: TemporalKind,
    ) -> Result<Vec<CellValue>> {
        let num_rows = source.num_rows();
        let mut buffer: Vec<CellValue> = Vec::new();
        buffer.try_reserve_exact(num_rows).map_err(|e| {
            ChronovecError::Materialization(format!(
                "buffer allocation for {num_rows} rows failed: {e}"
            ))
        })?;
        buffer.resize(num_rows, None);

        if self.parallel && self.workers > 1 {
            if let Some(pool) = worker_pool() {
                self.run_parallel(pool, source, format, kind, &mut buffer)?;
                return Ok(buffer);
            }
            warn!("worker pool unavailable, materializing sequentially");
        }
        self.run_sequential(source, format, kind, &mut buffer)?;
        Ok(buffer)
    }

    fn run_sequential(
        &self,
        source: &dyn RawColumnView,
        format: &FormatSpec,
        kind: TemporalKind,
        buffer: &mut [CellValue],
    ) -> Result<()> {
        let mut parser = TemporalParser::new(source.locale().clone());
        let cells = source.get_range(0, buffer.len());
        fill_piece(&mut parser, &cells, buffer, 0, format, kind)
    }

    fn run_parallel(
        &self,
        pool: &ThreadPool,
        source: &dyn RawColumnView,
        format: &FormatSpec,
        kind: TemporalKind,
        buffer: &mut [CellValue],
    ) -> Result<()> {
        let piece_len = buffer.len().div_ceil(self.workers).max(1);
        pool.install(|| {
            buffer
                .par_chunks_mut(piece_len)
                .enumerate()
                .try_for_each(|(piece, slice)| {
                    let lo = piece * piece_len;
                    // each worker owns its parser; none is ever shared
                    let mut parser = TemporalParser::new(source.locale().clone());
                    let cells = source.get_range(lo, lo + slice.len());
                    fill_piece(&mut parser, &cells, slice, lo, format, kind)
                })
        })
    }
}

fn fill_piece(
    parser: &mut TemporalParser,
    cells: &[String],
    slice: &mut [CellValue],
    lo: usize,
    format: &FormatSpec,
    kind: TemporalKind,
) -> Result<()> {
    if cells.len() != slice.len() {
        return Err(ChronovecError::Source(format!(
            "range [{}, {}) returned {} cells",
            lo,
            lo + slice.len(),
            cells.len()
        )));
    }
    for (out, raw) in slice.iter_mut().zip(cells.iter()) {
        *out = parser.parse(raw, format, kind);
    }
    Ok(())
}
