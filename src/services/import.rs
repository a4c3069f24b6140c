use serde::Deserialize;
use std::io::Read;
use thiserror::Error;

use crate::models::{ParticipantRecord, TagList};

/// Errors that can occur while reading an uploaded roster sheet
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid CSV roster: {0}")]
    Csv(#[from] csv::Error),
}

/// Column order of the roster sheet.
pub const IMPORT_HEADERS: [&str; 7] = [
    "Name",
    "Discord",
    "Email",
    "Wishlist",
    "Wishlist Tags",
    "Blacklist Tags",
    "References",
];

/// One row of the roster sheet. Only the identity columns are required.
#[derive(Debug, Deserialize)]
struct SheetRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Discord")]
    discord: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Wishlist", default)]
    wishlist: String,
    #[serde(rename = "Wishlist Tags", default)]
    wishlist_tags: String,
    #[serde(rename = "Blacklist Tags", default)]
    blacklist_tags: String,
    #[serde(rename = "References", default)]
    references: Option<String>,
}

impl From<SheetRow> for ParticipantRecord {
    fn from(row: SheetRow) -> Self {
        Self {
            name: row.name,
            discord: row.discord,
            email: row.email,
            wishlist: row.wishlist,
            wishlist_tags: TagList::Delimited(row.wishlist_tags),
            blacklist_tags: TagList::Delimited(row.blacklist_tags),
            references: row.references.filter(|r| !r.is_empty()),
        }
    }
}

/// Parse a roster sheet with a header line into canonical records, in row order.
pub fn read_participants<R: Read>(reader: R) -> Result<Vec<ParticipantRecord>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<SheetRow>() {
        records.push(row?.into());
    }

    Ok(records)
}
