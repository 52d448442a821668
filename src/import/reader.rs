//! Reads an accession register export and drives the importer over it.

use super::ImportSettings;
use super::cell::RawRow;
use super::importer::{ImportRun, RowImporter};
use crate::domain::{BookRepository, DomainError, NewBook};

/// Import a CSV export of the register.
///
/// Rows before `settings.start_row` (1-based) are headers. Accepted books are
/// written every `settings.batch_size` books and once more at the end. Only a
/// failing store or persistence layer aborts the run.
pub async fn import_accession_csv(
    content: &[u8],
    importer: &RowImporter<'_>,
    books: &dyn BookRepository,
    settings: &ImportSettings,
) -> Result<ImportRun, DomainError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content);

    let mut run = ImportRun::new();
    let mut pending: Vec<NewBook> = Vec::with_capacity(settings.batch_size);
    let batch_size = settings.batch_size.max(1);

    tracing::info!(
        bytes = content.len(),
        start_row = settings.start_row,
        batch_size,
        "Starting accession register import"
    );

    for (index, record) in rdr.byte_records().enumerate() {
        let row_number = index + 1;
        if row_number < settings.start_row {
            continue;
        }

        let row = match record {
            Ok(record) => RawRow::from(&record),
            Err(e) => {
                let err = DomainError::from(e);
                tracing::error!(row_number, error = %err, "Unreadable register row");
                run.record_failure(None, &err);
                continue;
            }
        };

        if let Some(book) = importer.import_row(&mut run, &row).await? {
            pending.push(book);
        }

        if pending.len() >= batch_size {
            flush(books, &mut pending).await?;
        }
    }

    flush(books, &mut pending).await?;

    tracing::info!(
        imported = run.imported_count,
        skipped = run.skipped_count,
        errors = run.errors.len(),
        "Accession register import finished"
    );

    Ok(run)
}

async fn flush(books: &dyn BookRepository, pending: &mut Vec<NewBook>) -> Result<(), DomainError> {
    if pending.is_empty() {
        return Ok(());
    }
    let written = books.create_many(std::mem::take(pending)).await?;
    tracing::debug!(written, "Persisted imported books");
    Ok(())
}
