//! Accession register import
//!
//! Loads legacy accession-register exports into the catalog: each row is
//! normalized, given an author (recovered from the title when the author
//! columns are blank) and a subject category, and turned into a book.

pub mod author;
pub mod category;
pub mod cell;
pub mod columns;
pub mod importer;
pub mod reader;

pub use author::resolve_author_name;
pub use category::{CategoryClassifier, CategoryMatching};
pub use cell::{RawCell, RawRow};
pub use columns::ColumnLayout;
pub use importer::{ImportRun, RowImporter, UNKNOWN_AUTHOR};
pub use reader::import_accession_csv;

/// Knobs for one import run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSettings {
    /// Books written per insert
    pub batch_size: usize,
    /// First data row, 1-based; earlier rows are the register's header
    pub start_row: usize,
    pub category_matching: CategoryMatching,
    pub layout: ColumnLayout,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            batch_size: 50,
            start_row: 8,
            category_matching: CategoryMatching::Legacy,
            layout: ColumnLayout::ACCESSION_REGISTER,
        }
    }
}
