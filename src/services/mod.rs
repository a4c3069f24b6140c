// Service exports
pub mod export;
pub mod history;
pub mod import;
pub mod store;

pub use export::{to_csv_bytes, write_csv, ExportError};
pub use import::{read_participants, ImportError, IMPORT_HEADERS};
pub use history::{merge_history, HistoryError, HistoryStore, InMemoryHistoryStore, PostgresHistoryStore};
pub use store::{
    confirm_matching, InMemoryMatchingStore, MatchingStatus, MatchingStore, StoreError, StoredMatching,
};
