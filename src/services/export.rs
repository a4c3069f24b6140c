use std::io::Write;
use thiserror::Error;

use crate::core::report::ExportRecord;

/// Errors that can occur while rendering an export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Column order of the assignment export.
pub const EXPORT_HEADERS: [&str; 7] = [
    "Requestor Name",
    "Requestor Discord",
    "Assignee Name",
    "Assignee Discord",
    "Prompt",
    "References",
    "Intro Message",
];

/// Write records as comma-delimited rows with a header line.
///
/// The header is written even when there are no records.
pub fn write_csv<W: Write>(records: &[ExportRecord], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(EXPORT_HEADERS)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;

    Ok(())
}

/// Render records into an in-memory CSV document.
pub fn to_csv_bytes(records: &[ExportRecord]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(buffer)
}
