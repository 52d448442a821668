//! Turns register rows into books, one row at a time.
//!
//! A row ends in one of three ways: imported (a `NewBook` is returned for the
//! caller to persist), skipped (blank row or no title), or skipped with an
//! error recorded in the `ImportRun`. Store failures are the only errors that
//! leave `import_row`; everything else stays inside the row.

use chrono::Local;
use serde::Serialize;

use super::ImportSettings;
use super::author::resolve_author_name;
use super::category::CategoryClassifier;
use super::cell::{RawRow, latest_publication_year};
use super::columns::{ColumnLayout, RowFields};
use crate::domain::{
    AuthorDefaults, AuthorRepository, BookStatus, CategoryRepository, DomainError, NewBook,
};

/// Author recorded when no name can be recovered
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Counters and error messages accumulated over one import
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportRun {
    pub imported_count: usize,
    pub skipped_count: usize,
    pub errors: Vec<String>,
}

impl ImportRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_imported(&mut self) {
        self.imported_count += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped_count += 1;
    }

    /// Count the row as skipped and keep a message naming it.
    pub fn record_failure(&mut self, title: Option<&str>, error: &DomainError) {
        let title = title.filter(|t| !t.is_empty()).unwrap_or("Unknown");
        self.errors
            .push(format!("Row error: {} (Title: {})", error, title));
        self.skipped_count += 1;
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// One-line summary for the person who started the import
    pub fn summary_message(&self) -> String {
        let mut message = format!(
            "Import completed! {} books imported",
            self.imported_count
        );
        if self.skipped_count > 0 {
            message.push_str(&format!(", {} rows skipped", self.skipped_count));
        }
        if self.has_errors() {
            message.push_str(". Some errors occurred - check logs for details.");
        }
        message
    }
}

/// Register details with no column of their own, kept in the description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportMetadata {
    pub accession_number: String,
    pub call_number: String,
    pub edition: String,
    pub volumes: String,
    pub cost_price: Option<f64>,
    pub source_of_fund: String,
    pub editor: String,
    pub imported_at: String,
}

impl ImportMetadata {
    pub fn from_fields(fields: &RowFields, imported_at: String) -> Self {
        Self {
            accession_number: fields.accession_number.clone(),
            call_number: fields.call_number.clone(),
            edition: fields.edition.clone(),
            volumes: fields.volumes.clone(),
            cost_price: fields.cost_price,
            source_of_fund: fields.source_of_fund.clone(),
            editor: fields.editor.clone(),
            imported_at,
        }
    }

    /// `notes`, a blank line, then the metadata as pretty JSON.
    pub fn append_to(&self, notes: &str) -> Result<String, DomainError> {
        let block = serde_json::to_string_pretty(self)
            .map_err(|e| DomainError::Internal(format!("metadata serialization: {}", e)))?;
        Ok(format!("{}\n\nImport Data: {}", notes, block))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither title nor author: separator or padding row
    BlankRow,
    /// Author present but nothing to call the book
    MissingTitle,
}

enum RowOutcome {
    Book(NewBook),
    Skipped(SkipReason),
}

/// Per-row import against the author and category stores
pub struct RowImporter<'a> {
    authors: &'a dyn AuthorRepository,
    classifier: CategoryClassifier<'a>,
    layout: ColumnLayout,
    max_year: i32,
}

impl<'a> RowImporter<'a> {
    pub fn new(
        authors: &'a dyn AuthorRepository,
        categories: &'a dyn CategoryRepository,
        settings: &ImportSettings,
    ) -> Self {
        Self {
            authors,
            classifier: CategoryClassifier::new(categories, settings.category_matching),
            layout: settings.layout,
            max_year: latest_publication_year(),
        }
    }

    /// Import one row. `Ok(None)` means the row was skipped; `Err` only for store failures.
    pub async fn import_row(
        &self,
        run: &mut ImportRun,
        row: &RawRow,
    ) -> Result<Option<NewBook>, DomainError> {
        let fields = RowFields::extract(row, &self.layout, self.max_year);

        match self.build_book(&fields).await {
            Ok(RowOutcome::Book(book)) => {
                run.record_imported();
                Ok(Some(book))
            }
            Ok(RowOutcome::Skipped(reason)) => {
                tracing::debug!(?reason, title = %fields.title, "Skipping register row");
                run.record_skipped();
                Ok(None)
            }
            Err(e) if e.is_infrastructure() => Err(e),
            Err(e) => {
                tracing::error!(
                    row = ?row,
                    error = %e,
                    file = file!(),
                    line = line!(),
                    "Library import error"
                );
                run.record_failure(Some(&fields.title), &e);
                Ok(None)
            }
        }
    }

    async fn build_book(&self, fields: &RowFields) -> Result<RowOutcome, DomainError> {
        if fields.title.is_empty() && fields.author.is_empty() {
            return Ok(RowOutcome::Skipped(SkipReason::BlankRow));
        }

        let mut author_name = resolve_author_name(&fields.author, &fields.editor, &fields.title);
        if author_name.is_empty() {
            author_name = UNKNOWN_AUTHOR.to_string();
        }

        if fields.title.is_empty() {
            return Ok(RowOutcome::Skipped(SkipReason::MissingTitle));
        }

        let imported_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let description =
            ImportMetadata::from_fields(fields, imported_at).append_to(&fields.notes)?;

        let mut book = NewBook {
            title: fields.title.clone(),
            isbn: None,
            author_id: 0,
            category_id: 0,
            publisher: non_empty(&fields.publisher),
            publication_year: fields.year,
            pages: fields.pages,
            description,
            total_copies: 1,
            available_copies: 1,
            location: non_empty(&fields.location),
            status: BookStatus::Available,
        };
        // Reject before touching the stores so a bad row leaves nothing behind
        book.validate(self.max_year)?;

        let author = self
            .authors
            .find_or_create(&author_name, AuthorDefaults::default())
            .await?;
        let category = self.classifier.classify(&fields.call_number).await?;

        book.author_id = author.id;
        book.category_id = category.id;

        Ok(RowOutcome::Book(book))
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_message() {
        let mut run = ImportRun::new();
        assert_eq!(run.summary_message(), "Import completed! 0 books imported");

        run.record_imported();
        run.record_imported();
        run.record_skipped();
        assert_eq!(
            run.summary_message(),
            "Import completed! 2 books imported, 1 rows skipped"
        );

        run.record_failure(Some("Dune"), &DomainError::Validation("bad".into()));
        assert_eq!(
            run.summary_message(),
            "Import completed! 2 books imported, 2 rows skipped. Some errors occurred - check logs for details."
        );
    }

    #[test]
    fn test_failure_message_names_title() {
        let mut run = ImportRun::new();
        let err = DomainError::Validation("page count must be positive, got 0".into());
        run.record_failure(Some("Dune"), &err);
        run.record_failure(Some(""), &err);
        run.record_failure(None, &err);

        assert_eq!(run.skipped_count, 3);
        assert_eq!(
            run.errors[0],
            "Row error: Validation error: page count must be positive, got 0 (Title: Dune)"
        );
        assert!(run.errors[1].ends_with("(Title: Unknown)"));
        assert!(run.errors[2].ends_with("(Title: Unknown)"));
    }

    #[test]
    fn test_metadata_block() {
        let fields = RowFields {
            accession_number: "ACC1".into(),
            call_number: "004.1".into(),
            cost_price: Some(1250.5),
            notes: "Donated copy".into(),
            ..RowFields::default()
        };
        let metadata = ImportMetadata::from_fields(&fields, "2026-10-16 09:30:00".into());
        let description = metadata.append_to(&fields.notes).unwrap();

        let (notes, block) = description.split_once("\n\nImport Data: ").unwrap();
        assert_eq!(notes, "Donated copy");

        let parsed: serde_json::Value = serde_json::from_str(block).unwrap();
        assert_eq!(parsed["accession_number"], "ACC1");
        assert_eq!(parsed["call_number"], "004.1");
        assert_eq!(parsed["cost_price"], 1250.5);
        assert_eq!(parsed["edition"], "");
        assert_eq!(parsed["imported_at"], "2026-10-16 09:30:00");
        assert!(block.contains("\n  \"volumes\": \"\""));
    }

    #[test]
    fn test_metadata_without_price_is_null() {
        let metadata = ImportMetadata::from_fields(&RowFields::default(), String::new());
        let description = metadata.append_to("").unwrap();
        assert!(description.starts_with("\n\nImport Data: {"));
        assert!(description.contains("\"cost_price\": null"));
    }
}
