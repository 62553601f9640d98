//! sketch-store: durable collection of recognition results.
//!
//! Design rules:
//! - Storage is a plain key-value interface; the history is one JSON document under one key.
//! - The history is append-only. It is saved after every change and loaded once at startup.
//! - No schema versioning: changing `RecognitionRecord` breaks previously saved data.

use thiserror::Error;

pub mod history;
pub mod kv;

pub use history::{HistoryStore, HISTORY_KEY};
pub use kv::{FileStore, KeyValueStore, MemoryStore};

/// Store-level errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid storage key: {key:?}")]
    InvalidKey { key: String },
}
