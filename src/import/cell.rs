//! Raw spreadsheet cells and the normalizers that turn them into typed values.
//!
//! Every normalizer is total: malformed input becomes `None` (or an empty
//! string), never an error.

use chrono::{Datelike, Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Numeric year cells above this are spreadsheet serial dates, not years.
pub const SERIAL_DATE_THRESHOLD: f64 = 25000.0;

static FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").expect("valid regex"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid regex"));
static PRICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:,[0-9]+)*(?:\.[0-9]+)?").expect("valid regex"));

static EMPTY_CELL: RawCell = RawCell::Empty;

/// A cell as the spreadsheet reader hands it over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
}

impl RawCell {
    /// Spreadsheet notion of "empty": no value, "", "0" or 0.
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Number(n) => *n == 0.0,
            RawCell::Text(s) => s.is_empty() || s == "0",
        }
    }

    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RawCell::Empty => Cow::Borrowed(""),
            RawCell::Number(n) => Cow::Owned(format_number(*n)),
            RawCell::Text(s) => Cow::Borrowed(s),
        }
    }

    /// Numeric value of the cell; numeric-looking text counts.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawCell::Empty => None,
            RawCell::Number(n) => Some(*n),
            RawCell::Text(s) => s.trim().parse::<f64>().ok(),
        }
        .filter(|n| n.is_finite())
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(s.to_string())
        }
    }
}

impl From<f64> for RawCell {
    fn from(n: f64) -> Self {
        RawCell::Number(n)
    }
}

// Integral floats print without a fractional part, the way a spreadsheet shows them
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One register row, indexed by zero-based column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(Vec<RawCell>);

impl RawRow {
    pub fn new(cells: Vec<RawCell>) -> Self {
        Self(cells)
    }

    /// Missing trailing columns read as empty cells
    pub fn get(&self, index: usize) -> &RawCell {
        self.0.get(index).unwrap_or(&EMPTY_CELL)
    }

    pub fn set(&mut self, index: usize, cell: impl Into<RawCell>) {
        if self.0.len() <= index {
            self.0.resize(index + 1, RawCell::Empty);
        }
        self.0[index] = cell.into();
    }

    pub fn with(mut self, index: usize, cell: impl Into<RawCell>) -> Self {
        self.set(index, cell);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|c| matches!(c, RawCell::Empty))
    }
}

impl From<Vec<RawCell>> for RawRow {
    fn from(cells: Vec<RawCell>) -> Self {
        Self(cells)
    }
}

impl From<&csv::ByteRecord> for RawRow {
    fn from(record: &csv::ByteRecord) -> Self {
        Self(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(String::from_utf8_lossy(field).into_owned())
                    }
                })
                .collect(),
        )
    }
}

/// Latest publication year accepted today (next year's releases are catalogued early).
pub fn latest_publication_year() -> i32 {
    Local::now().year() + 1
}

/// Collapse whitespace runs to one space and trim.
pub fn clean_string(value: &RawCell) -> String {
    value
        .as_text()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn extract_year(value: &RawCell) -> Option<i32> {
    extract_year_until(value, latest_publication_year())
}

/// Year in `1000..=max_year`, from a serial date or the first four digits of the text.
pub fn extract_year_until(value: &RawCell, max_year: i32) -> Option<i32> {
    if value.is_blank() {
        return None;
    }

    if let Some(serial) = value.as_number()
        && serial > SERIAL_DATE_THRESHOLD
        && let Some(year) = serial_date_year(serial)
        && (1000..=max_year).contains(&year)
    {
        return Some(year);
    }

    let text = value.as_text();
    let year: i32 = FOUR_DIGITS.find(&text)?.as_str().parse().ok()?;
    (1000..=max_year).contains(&year).then_some(year)
}

// Day 0 of the 1900 date system as spreadsheets count it (includes the phantom 1900-02-29)
fn serial_date_year(serial: f64) -> Option<i32> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = serial.trunc();
    if days < 0.0 || days > u32::MAX as f64 {
        return None;
    }
    epoch
        .checked_add_days(Days::new(days as u64))
        .map(|date| date.year())
}

/// First run of digits anywhere in the value.
pub fn extract_pages(value: &RawCell) -> Option<i32> {
    if value.is_blank() {
        return None;
    }
    let text = value.as_text();
    DIGITS.find(&text)?.as_str().parse().ok()
}

/// First number in the value, thousands separators ignored.
pub fn extract_price(value: &RawCell) -> Option<f64> {
    if value.is_blank() {
        return None;
    }
    let text = value.as_text().replace(',', "");
    PRICE.find(&text)?.as_str().replace(',', "").parse().ok()
}
