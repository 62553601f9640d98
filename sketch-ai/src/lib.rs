// This defines what we send to the generative model and the JSON we accept back
// Parse and validate it
// Convert it to what the rest of Magic Sketch understands

use async_trait::async_trait;
use sketch_core::{EncodedImage, RecognitionKind, SupportedLanguage};
use thiserror::Error;

pub mod config;
pub mod gemini;
pub mod illustration;
pub mod schema;

pub use config::AiConfig;
pub use gemini::GeminiClient;
pub use illustration::{illustration_url, placeholder_url, random_seed};
pub use schema::Identification;

/// Shown when the model answers a translation with no text.
pub const TRANSLATION_FAILED: &str = "Translation failed.";

/// Turns an image into a word card. Implemented by the real model client and by test fakes.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn identify(
        &self,
        image: &EncodedImage,
        kind: RecognitionKind,
    ) -> Result<Identification, AiError>;
}

/// Translates text and/or the text found in an image.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, AiError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub target: SupportedLanguage,
    pub image: Option<EncodedImage>,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, target: SupportedLanguage) -> Self {
        Self {
            text: text.into(),
            target,
            image: None,
        }
    }

    pub fn with_image(mut self, image: Option<EncodedImage>) -> Self {
        self.image = image;
        self
    }

    /// Nothing to translate: no text and no image.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.image.is_none()
    }
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("API key is missing: set {var}")]
    MissingApiKey { var: &'static str },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse model response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no response text")]
    EmptyResponse,

    #[error("model response has blank fields: {fields:?}")]
    InvalidResponse { fields: Vec<&'static str> },
}
