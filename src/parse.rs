// turns one raw cell into an encoded temporal value, or nothing

use std::cell::Cell;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::marker::PhantomData;

// used for the calendar arithmetic behind every encoded value
use chrono::format::{Item, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use lazy_static::lazy_static;
use regex::Regex;
use seahash::SeaHasher;

use crate::source::Locale;

pub type PatternHasher = BuildHasherDefault<SeaHasher>;

/// An encoded cell: whole days since 1970-01-01 for dates, seconds (may be
/// fractional) since the same epoch for date-times. `None` is the missing
/// value, standing in for any cell that failed to parse or validate.
pub type CellValue = Option<f64>;

/// Which temporal encoding a column carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    Date,
    DateTime,
}

/// Grammar selector for a column: an explicit strftime-style pattern, or the
/// default sentinel meaning locale-aware date parsing (for dates) and strict
/// ISO-8601 (for date-times).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSpec {
    Default,
    Pattern(String),
}
impl From<&str> for FormatSpec {
    // the empty pattern is the historical spelling of "no explicit format"
    fn from(pattern: &str) -> Self {
        if pattern.is_empty() {
            FormatSpec::Default
        } else {
            FormatSpec::Pattern(pattern.to_owned())
        }
    }
}

lazy_static! {
    // four digit year, then month and day, numeric with either separator
    static ref FLEXIBLE_YMD: Regex = Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})$").unwrap();
}

// naive forms accepted by the default date-time grammar, most common first
const ISO_DATETIME_PATTERNS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Stateful decoder turning raw text into [`CellValue`]s.
///
/// A parser owns its locale copy and a cache of compiled patterns, so the
/// cost of compiling a format is paid once per parser rather than once per
/// cell. The scratch state is single-owner: a parser lives either with one
/// vector (on-demand reads) or with one worker (bulk reads), and the `!Sync`
/// marker keeps it out of shared contexts.
pub struct TemporalParser {
    locale: Locale,
    compiled: HashMap<String, Vec<Item<'static>>, PatternHasher>,
    _scratch: PhantomData<Cell<()>>,
}

impl TemporalParser {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            compiled: HashMap::default(),
            _scratch: PhantomData,
        }
    }

    /// Parse one raw cell under the given grammar and kind.
    ///
    /// Failures of any sort, lexical, grammatical or calendrical, come back
    /// as `None` and are never surfaced as errors from this layer.
    pub fn parse(&mut self, raw: &str, format: &FormatSpec, kind: TemporalKind) -> CellValue {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match (format, kind) {
            (FormatSpec::Pattern(pattern), TemporalKind::Date) => {
                self.parse_pattern_date(raw, pattern)
            }
            (FormatSpec::Pattern(pattern), TemporalKind::DateTime) => {
                self.parse_pattern_datetime(raw, pattern)
            }
            (FormatSpec::Default, TemporalKind::Date) => self.parse_locale_date(raw),
            (FormatSpec::Default, TemporalKind::DateTime) => self.parse_iso_datetime(raw),
        }
    }

    // compile on first use, then serve every later cell from the cache
    fn compiled_items(&mut self, pattern: &str) -> Option<&[Item<'static>]> {
        if !self.compiled.contains_key(pattern) {
            let items = StrftimeItems::new(pattern).parse_to_owned().ok()?;
            self.compiled.insert(pattern.to_owned(), items);
        }
        self.compiled.get(pattern).map(Vec::as_slice)
    }

    fn parse_with_pattern(&mut self, raw: &str, pattern: &str) -> Option<Parsed> {
        let items = self.compiled_items(pattern)?;
        let mut parsed = Parsed::new();
        chrono::format::parse(&mut parsed, raw, items.iter()).ok()?;
        Some(parsed)
    }

    fn parse_pattern_date(&mut self, raw: &str, pattern: &str) -> CellValue {
        let parsed = self.parse_with_pattern(raw, pattern)?;
        // to_naive_date is where February 30th and friends get rejected
        let date = parsed.to_naive_date().ok()?;
        Some(days_since_epoch(date) as f64)
    }

    fn parse_pattern_datetime(&mut self, raw: &str, pattern: &str) -> CellValue {
        let parsed = self.parse_with_pattern(raw, pattern)?;
        if let Ok(instant) = parsed.to_datetime() {
            return Some(epoch_seconds_with_offset(&instant));
        }
        // no offset in the pattern: the column timezone label applies
        let datetime = parsed.to_naive_datetime_with_offset(0).ok()?;
        Some(epoch_seconds(datetime))
    }

    // the default date grammar: the locale's own format first, then the
    // flexible numeric year-month-day form
    fn parse_locale_date(&mut self, raw: &str) -> CellValue {
        let date_format = self.locale.date_format().to_owned();
        if let Some(value) = self.parse_pattern_date(raw, &date_format) {
            return Some(value);
        }
        let captures = FLEXIBLE_YMD.captures(raw)?;
        let year = captures[1].parse().ok()?;
        let month = captures[2].parse().ok()?;
        let day = captures[3].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(days_since_epoch(date) as f64)
    }

    // the default date-time grammar: strict ISO-8601, offsets honored,
    // naive forms read in the column timezone, a bare date taken as midnight
    fn parse_iso_datetime(&mut self, raw: &str) -> CellValue {
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Some(epoch_seconds_with_offset(&instant));
        }
        for pattern in ISO_DATETIME_PATTERNS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, pattern) {
                return Some(epoch_seconds(datetime));
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(epoch_seconds(date.and_hms_opt(0, 0, 0)?));
        }
        None
    }
}

// ------------- Encoding -------------

fn epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

fn days_since_epoch(date: NaiveDate) -> i64 {
    date.signed_duration_since(epoch_date()).num_days()
}

fn epoch_seconds(datetime: NaiveDateTime) -> f64 {
    let instant = datetime.and_utc();
    instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) / 1e9
}

fn epoch_seconds_with_offset(instant: &DateTime<FixedOffset>) -> f64 {
    instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) / 1e9
}
