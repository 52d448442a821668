//! Where each field lives in an accession register row.

use super::cell::{RawRow, clean_string, extract_pages, extract_price, extract_year_until};

/// Zero-based column index of every field the importer reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub accession_number: usize,
    pub call_number: usize,
    pub author: usize,
    pub editor: usize,
    pub title: usize,
    pub edition: usize,
    pub volumes: usize,
    pub pages: usize,
    pub source_of_fund: usize,
    pub cost_price: usize,
    pub publisher: usize,
    pub year: usize,
    pub location: usize,
    pub notes: usize,
}

impl ColumnLayout {
    /// Legacy register export: columns C through P
    pub const ACCESSION_REGISTER: Self = Self {
        accession_number: 2, // C
        call_number: 3,      // D
        author: 4,           // E
        editor: 5,           // F
        title: 6,            // G
        edition: 7,          // H
        volumes: 8,          // I
        pages: 9,            // J
        source_of_fund: 10,  // K
        cost_price: 11,      // L
        publisher: 12,       // M
        year: 13,            // N
        location: 14,        // O
        notes: 15,           // P
    };
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::ACCESSION_REGISTER
    }
}

/// Normalized values of one row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFields {
    pub accession_number: String,
    pub call_number: String,
    pub author: String,
    pub editor: String,
    pub title: String,
    pub edition: String,
    pub volumes: String,
    pub pages: Option<i32>,
    pub source_of_fund: String,
    pub cost_price: Option<f64>,
    pub publisher: String,
    pub year: Option<i32>,
    pub location: String,
    pub notes: String,
}

impl RowFields {
    pub fn extract(row: &RawRow, layout: &ColumnLayout, max_year: i32) -> Self {
        Self {
            accession_number: clean_string(row.get(layout.accession_number)),
            call_number: clean_string(row.get(layout.call_number)),
            author: clean_string(row.get(layout.author)),
            editor: clean_string(row.get(layout.editor)),
            title: clean_string(row.get(layout.title)),
            edition: clean_string(row.get(layout.edition)),
            volumes: clean_string(row.get(layout.volumes)),
            // "0 p." and "00" are placeholders, not a page count
            pages: extract_pages(row.get(layout.pages)).filter(|&p| p > 0),
            source_of_fund: clean_string(row.get(layout.source_of_fund)),
            cost_price: extract_price(row.get(layout.cost_price)),
            publisher: clean_string(row.get(layout.publisher)),
            year: extract_year_until(row.get(layout.year), max_year),
            location: clean_string(row.get(layout.location)),
            notes: clean_string(row.get(layout.notes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::cell::RawCell;

    #[test]
    fn test_extract_register_row() {
        let row = RawRow::default()
            .with(2, "ACC-0042")
            .with(3, "530.1 FEY")
            .with(6, "  The Feynman   Lectures ")
            .with(9, "xii, 560 p.")
            .with(11, "1,250.50")
            .with(12, "Addison-Wesley")
            .with(13, RawCell::Number(1963.0))
            .with(15, "Physics");

        let fields = RowFields::extract(&row, &ColumnLayout::default(), 2027);
        assert_eq!(fields.accession_number, "ACC-0042");
        assert_eq!(fields.call_number, "530.1 FEY");
        assert_eq!(fields.title, "The Feynman Lectures");
        assert_eq!(fields.author, "");
        assert_eq!(fields.pages, Some(560));
        assert_eq!(fields.cost_price, Some(1250.50));
        assert_eq!(fields.year, Some(1963));
        assert_eq!(fields.notes, "Physics");
    }

    #[test]
    fn test_zero_page_count_reads_as_absent() {
        for pages in ["0 p.", "00", "-"] {
            let row = RawRow::default().with(6, "Pamphlet").with(9, pages);
            let fields = RowFields::extract(&row, &ColumnLayout::default(), 2027);
            assert_eq!(fields.pages, None, "pages cell {:?}", pages);
        }
    }

    #[test]
    fn test_custom_layout() {
        let layout = ColumnLayout {
            title: 0,
            ..ColumnLayout::ACCESSION_REGISTER
        };
        let row = RawRow::default().with(0, "Moved Title").with(6, "Old Slot");
        let fields = RowFields::extract(&row, &layout, 2027);
        assert_eq!(fields.title, "Moved Title");
    }

    #[test]
    fn test_short_row_reads_as_blank() {
        let row = RawRow::new(vec![RawCell::Empty, RawCell::Text("1".into())]);
        assert_eq!(
            RowFields::extract(&row, &ColumnLayout::default(), 2027),
            RowFields::default()
        );
    }
}
