//! sketch-core: shared record types for Magic Sketch.
//!
//! Design rules:
//! - Recognition records are the only thing that gets persisted; their JSON layout is the storage contract.
//! - Images travel between crates as encoded payloads (PNG/JPEG), never as raw pixels.
//! - The AI decides names and sentences; this crate only carries them around.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

pub mod image;
pub mod language;

pub use image::{EncodedImage, ImageError, PNG_MIME};
pub use language::{SupportedLanguage, UnknownLanguage};

/// Where the recognized image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionKind {
    Sketch,
    Photo,
}

impl RecognitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecognitionKind::Sketch => "sketch",
            RecognitionKind::Photo => "photo",
        }
    }
}

/// The words the model came up with for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCard {
    pub english_name: String,
    pub chinese_name: String,
    /// IPA, without the surrounding slashes.
    pub phonetic: String,
    pub emoji: String,
    pub simple_sentence: Option<String>,
}

impl WordCard {
    /// Names of required fields that are blank.
    pub fn blank_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("englishName", &self.english_name),
            ("chineseName", &self.chinese_name),
            ("phonetic", &self.phonetic),
            ("emoji", &self.emoji),
        ];
        fields
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}

/// One entry in the collection. Serialized as-is into the history store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionRecord {
    pub id: String,
    pub english_name: String,
    pub chinese_name: String,
    pub phonetic: String,
    pub emoji: String,
    #[serde(rename = "type")]
    pub kind: RecognitionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple_sentence: Option<String>,
    /// Data URI of the sketch or photo that was identified.
    pub source_image: String,
    /// Illustration URL, sketches only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl RecognitionRecord {
    /// Build a record stamped with a fresh id and the current time.
    pub fn new(kind: RecognitionKind, card: WordCard, source_image: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            english_name: card.english_name,
            chinese_name: card.chinese_name,
            phonetic: card.phonetic,
            emoji: card.emoji,
            kind,
            simple_sentence: card.simple_sentence,
            source_image: source_image.into(),
            generated_image: None,
            timestamp: now_millis(),
        }
    }

    pub fn with_generated_image(mut self, url: Option<String>) -> Self {
        self.generated_image = url;
        self
    }

    pub fn recorded_at(&self) -> Result<OffsetDateTime, RecordError> {
        let nanos = i128::from(self.timestamp) * 1_000_000;
        OffsetDateTime::from_unix_timestamp_nanos(nanos).map_err(|_| RecordError::InvalidTimestamp {
            timestamp: self.timestamp,
        })
    }
}

fn now_millis() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    (nanos / 1_000_000) as i64
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("timestamp out of range: {timestamp}")]
    InvalidTimestamp { timestamp: i64 },
}
