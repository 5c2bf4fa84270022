//! The lazy temporal vector: parse-on-read until somebody asks for all of it.

use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{ChronovecError, Result};
use crate::materialize::Materializer;
use crate::parse::{CellValue, FormatSpec, TemporalKind, TemporalParser};
use crate::registry::registry;
use crate::settings::EngineSettings;
use crate::source::RawColumnView;

/// A column of temporal values that parses cells on demand.
///
/// Single-element reads go through a vector-owned parser without touching
/// the rest of the column. [`LazyTemporalVector::materialize`] parses every
/// cell exactly once into a cached buffer; afterwards reads are plain
/// indexing. The two paths agree element-wise: whatever `get` returned
/// before materialization is what the buffer holds after it.
pub struct LazyTemporalVector {
    length: usize,
    kind: TemporalKind,
    format: FormatSpec,
    timezone: String,
    settings: EngineSettings,
    // dropped by release(), or after materialization when configured so
    source: Mutex<Option<Arc<dyn RawColumnView>>>,
    // the on-demand parser, created on first get and reused afterwards;
    // the mutex hands it to one reader at a time, it never crosses threads
    scratch: Mutex<Option<TemporalParser>>,
    // write-once home of the materialized buffer
    cache: OnceLock<Vec<CellValue>>,
    // serializes the first materialization so exactly one run happens
    gate: Mutex<()>,
}

impl LazyTemporalVector {
    pub fn new(
        source: Arc<dyn RawColumnView>,
        format: FormatSpec,
        kind: TemporalKind,
        settings: EngineSettings,
    ) -> Self {
        let length = source.num_rows();
        let timezone = source.locale().timezone().to_owned();
        Self {
            length,
            kind,
            format,
            timezone,
            settings,
            source: Mutex::new(Some(source)),
            scratch: Mutex::new(None),
            cache: OnceLock::new(),
            gate: Mutex::new(()),
        }
    }

    pub fn date(source: Arc<dyn RawColumnView>, format: FormatSpec, settings: EngineSettings) -> Self {
        Self::new(source, format, TemporalKind::Date, settings)
    }

    pub fn datetime(source: Arc<dyn RawColumnView>, format: FormatSpec, settings: EngineSettings) -> Self {
        Self::new(source, format, TemporalKind::DateTime, settings)
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn kind(&self) -> TemporalKind {
        self.kind
    }

    pub fn class_name(&self) -> &'static str {
        registry().class_for(self.kind).name()
    }

    /// The column timezone label; carried for date-times only.
    pub fn timezone(&self) -> Option<&str> {
        match self.kind {
            TemporalKind::DateTime => Some(&self.timezone),
            TemporalKind::Date => None,
        }
    }

    pub fn is_materialized(&self) -> bool {
        self.cache.get().is_some()
    }

    /// The element at `row`.
    ///
    /// Before materialization this parses the single raw cell; afterwards it
    /// indexes the buffer. Never triggers materialization.
    ///
    /// Panics when `row` is out of bounds, or when the vector was released
    /// before any buffer existed; both are bugs in the calling host.
    pub fn get(&self, row: usize) -> CellValue {
        assert!(
            row < self.length,
            "row {row} out of bounds for column of length {}",
            self.length
        );
        if let Some(buffer) = self.cache.get() {
            return buffer[row];
        }
        let source = {
            let guard = self.source.lock().unwrap();
            match guard.as_ref().map(Arc::clone) {
                Some(source) => source,
                // the source can vanish mid-call when a racing materialization
                // hands it back; the buffer is always published first
                None => {
                    drop(guard);
                    if let Some(buffer) = self.cache.get() {
                        return buffer[row];
                    }
                    panic!("column read after release");
                }
            }
        };
        let raw = source.get(row);
        let mut scratch = self.scratch.lock().unwrap();
        let parser =
            scratch.get_or_insert_with(|| TemporalParser::new(source.locale().clone()));
        parser.parse(&raw, &self.format, self.kind)
    }

    /// Parse the whole column once and cache the buffer.
    ///
    /// Idempotent: later calls (and concurrent first calls) observe the one
    /// buffer produced by the single physical run. On error the vector stays
    /// unmaterialized and the call may be retried.
    pub fn materialize(&self) -> Result<&[CellValue]> {
        if let Some(buffer) = self.cache.get() {
            return Ok(buffer);
        }
        let _gate = self
            .gate
            .lock()
            .map_err(|e| ChronovecError::Lock(e.to_string()))?;
        if let Some(buffer) = self.cache.get() {
            return Ok(buffer);
        }
        let source = self
            .source
            .lock()
            .map_err(|e| ChronovecError::Lock(e.to_string()))?
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| {
                ChronovecError::Released(String::from("cannot materialize a released column"))
            })?;

        let materializer = Materializer::new(&self.settings);
        let started = Instant::now();
        debug!(
            rows = self.length,
            workers = self.settings.workers,
            parallel = self.settings.parallel,
            "materializing temporal column"
        );
        let buffer = materializer.run(&*source, &self.format, self.kind)?;
        let missing = buffer.iter().filter(|cell| cell.is_none()).count();
        info!(
            rows = self.length,
            missing,
            ms = started.elapsed().as_secs_f64() * 1000.0,
            "temporal column materialized"
        );
        let buffer = self.cache.get_or_init(move || buffer);

        if self.settings.release_source_after_materialize {
            self.release();
        }
        Ok(buffer)
    }

    /// Diagnostic one-liner: class, length and materialization state.
    pub fn inspect(&self) -> String {
        format!(
            "{} (len={}, materialized={})",
            self.class_name(),
            self.length,
            if self.is_materialized() { "T" } else { "F" }
        )
    }

    /// Hand back the source reference and drop the scratch parser.
    ///
    /// Invoked by the owning host when the vector is discarded; safe to call
    /// any number of times. A materialized vector keeps serving reads from
    /// its buffer after release; an unmaterialized one has nothing left to
    /// read from.
    pub fn release(&self) {
        if let Ok(mut guard) = self.source.lock() {
            *guard = None;
        }
        if let Ok(mut guard) = self.scratch.lock() {
            *guard = None;
        }
    }
}
