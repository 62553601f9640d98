//! History store for Magic Sketch.
//!
//! The collection is an ordered, append-only list of recognition records. It is:
//! - loaded once when the app starts
//! - saved in full after every append or clear
//! - stored as a JSON array under [`HISTORY_KEY`]

use anyhow::Context;
use sketch_core::RecognitionRecord;

use crate::kv::KeyValueStore;

/// Storage key the collection lives under.
pub const HISTORY_KEY: &str = "magicSketchHistory";

#[derive(Debug)]
pub struct HistoryStore<S> {
    store: S,
    records: Vec<RecognitionRecord>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Load the collection from `store`. A missing key means an empty collection.
    pub fn load(store: S) -> anyhow::Result<Self> {
        let records = match store.get(HISTORY_KEY)? {
            Some(data) => serde_json::from_str::<Vec<RecognitionRecord>>(&data)
                .context("parse history json")?,
            None => Vec::new(),
        };
        tracing::info!(count = records.len(), "loaded history");

        Ok(Self { store, records })
    }

    /// Append a record and save. The record stays in memory even if saving fails.
    pub fn append(&mut self, record: RecognitionRecord) -> anyhow::Result<()> {
        tracing::debug!(id = %record.id, name = %record.english_name, "appending history record");
        self.records.push(record);
        self.save()
    }

    /// Drop every record and save the empty collection.
    pub fn clear(&mut self) -> anyhow::Result<()> {
        tracing::info!(count = self.records.len(), "clearing history");
        self.records.clear();
        self.save()
    }

    /// Records in the order they were added.
    pub fn records(&self) -> &[RecognitionRecord] {
        &self.records
    }

    /// Records as the collection screen lists them.
    pub fn newest_first(&self) -> impl Iterator<Item = &RecognitionRecord> + '_ {
        self.records.iter().rev()
    }

    pub fn get(&self, id: &str) -> Option<&RecognitionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn save(&mut self) -> anyhow::Result<()> {
        let json = serde_json::to_string(&self.records).context("serialize history to json")?;
        self.store
            .set(HISTORY_KEY, &json)
            .context("save history")?;
        tracing::debug!(count = self.records.len(), "history saved");
        Ok(())
    }
}
