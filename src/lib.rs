//! Chronovec – lazy temporal columns for tabular loaders.
//!
//! When a loader recognizes a column as temporal it can hand the raw text
//! cells to a [`vector::LazyTemporalVector`] instead of parsing them all up
//! front. Single elements are decoded on demand; a bulk
//! [`vector::LazyTemporalVector::materialize`] call parses every cell once
//! on a worker pool and caches the buffer. Both paths agree element-wise,
//! so callers never see a value change underneath them.
//!
//! ## Modules
//! * [`source`] – The [`source::RawColumnView`] access layer over raw cells,
//!   the attached [`source::Locale`] descriptor, and an in-memory column for
//!   embedding and tests.
//! * [`parse`] – The [`parse::TemporalParser`] decoder plus the format and
//!   kind selectors and the numeric cell encoding.
//! * [`vector`] – The lazy vector itself: on-demand reads, the once-only
//!   materialization gate, inspection and teardown.
//! * [`materialize`] – Partitioning and the worker pool behind bulk runs.
//! * [`registry`] – Process-wide column class registration, initialized once.
//! * [`settings`] – Worker pool and teardown knobs, read via `config`.
//!
//! ## Encoding
//! Dates become whole days since 1970-01-01 and date-times seconds (possibly
//! fractional) since the same epoch, both as `f64`. A cell that fails to
//! parse, or names an impossible calendar value, is `None`; nothing at this
//! layer ever aborts on bad input. The timezone label rides on the column,
//! not on individual values.
//!
//! ## Quick Start
//! ```
//! use std::sync::Arc;
//! use chronovec::parse::{FormatSpec, TemporalKind};
//! use chronovec::settings::EngineSettings;
//! use chronovec::source::TextColumn;
//! use chronovec::vector::LazyTemporalVector;
//!
//! let column = Arc::new(TextColumn::new(vec![
//!     String::from("2021-03-15"),
//!     String::from("not a date"),
//! ]));
//! let vector = LazyTemporalVector::new(
//!     column,
//!     FormatSpec::Default,
//!     TemporalKind::Date,
//!     EngineSettings::default(),
//! );
//! assert_eq!(vector.get(0), Some(18701.0));
//! assert_eq!(vector.get(1), None);
//! assert!(!vector.is_materialized());
//!
//! let buffer = vector.materialize().unwrap();
//! assert_eq!(buffer, &[Some(18701.0), None]);
//! ```
//!
//! ## Concurrency
//! `materialize` is safe to race: a double-checked gate lets exactly one
//! physical run happen, and every caller gets the same buffer. Parser
//! scratch state is never shared between threads; each worker builds its
//! own. Reads are lock-free once the buffer exists.

pub mod error;
pub mod materialize;
pub mod parse;
pub mod registry;
pub mod settings;
pub mod source;
pub mod vector;
