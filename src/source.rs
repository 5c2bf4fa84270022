// the access layer over raw text cells, owned by whatever tokenized the file

// used to print out readable forms of a locale
use std::fmt;

// ------------- Locale -------------
// Carried alongside a column so parsers know how to read ambiguous text.
// Immutable once constructed; hand out copies, never mutate in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    date_format: String,
    timezone: String,
}

impl Locale {
    pub fn new(date_format: String, timezone: String) -> Self {
        Self {
            date_format,
            timezone,
        }
    }
    // It's intentional to encapsulate the fields in the struct
    // and only expose them using "getters", because this yields
    // true immutability for locales after creation.
    pub fn date_format(&self) -> &str {
        &self.date_format
    }
    pub fn timezone(&self) -> &str {
        &self.timezone
    }
}
impl Default for Locale {
    fn default() -> Self {
        Self {
            date_format: String::from("%Y-%m-%d"),
            timezone: String::from("UTC"),
        }
    }
}
impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.date_format, self.timezone)
    }
}

// ------------- RawColumnView -------------
/// Read-only view over one column's raw text cells.
///
/// Implementations are immutable and thread-safe for the lifetime of any
/// vector borrowing them. A range read materializes the requested cells as
/// owned strings so workers can parse without holding the view's internals.
pub trait RawColumnView: Send + Sync {
    fn num_rows(&self) -> usize;
    fn get(&self, row: usize) -> String;
    fn get_range(&self, lo: usize, hi: usize) -> Vec<String> {
        (lo..hi).map(|row| self.get(row)).collect()
    }
    fn locale(&self) -> &Locale;
}

// ------------- TextColumn -------------
/// In-memory [`RawColumnView`] over a vector of cells.
///
/// The indexing layer of a real loader sits behind the same trait; this one
/// exists so the engine can be exercised without any file handling.
pub struct TextColumn {
    cells: Vec<String>,
    locale: Locale,
}

impl TextColumn {
    pub fn new(cells: Vec<String>) -> Self {
        Self {
            cells,
            locale: Locale::default(),
        }
    }
    pub fn with_locale(cells: Vec<String>, locale: Locale) -> Self {
        Self { cells, locale }
    }
}
impl RawColumnView for TextColumn {
    fn num_rows(&self) -> usize {
        self.cells.len()
    }
    fn get(&self, row: usize) -> String {
        self.cells[row].clone()
    }
    fn get_range(&self, lo: usize, hi: usize) -> Vec<String> {
        self.cells[lo..hi].to_vec()
    }
    fn locale(&self) -> &Locale {
        &self.locale
    }
}
