use crate::utils::log_entry::io::IOEntry;
use serde_json::error::Error as SerdeJsonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreEntry {
    #[error("History loaded with {0} entries")]
    Loaded(usize),
    #[error("Legacy history with {0} entries converted to line format")]
    Migrated(usize),
    #[error("Skipped unreadable history line {0}: {1}")]
    CorruptLineSkipped(usize, SerdeJsonError),
    #[error("Discarded {0} byte(s) of an unfinished history line")]
    PartialLineDiscarded(u64),
    #[error("Record {0} not found")]
    HistoryNotFoundError(String),
    #[error("History writer is not running")]
    StoreClosedError,
    #[error("Failed to persist history: {0}")]
    PersistError(#[from] IOEntry),
}

impl From<StoreEntry> for String {
    #[inline(always)]
    fn from(value: StoreEntry) -> Self {
        value.to_string()
    }
}
