//! The app shell: which screen is showing, the result card, and the
//! identify/translate actions that talk to the model.
//!
//! Design rules:
//! - Model calls go through the `Recognizer`/`Translator` traits only.
//! - Failures never escape as errors; they become a `Notice` for the user.
//! - One request at a time. The processing flag is reset on every path,
//!   including a dropped future. Views read it through a `ProcessingFlag` handle,
//!   and shells that share a handle share the one-request limit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sketch_ai::{illustration_url, random_seed, Recognizer, TranslationRequest, Translator};
use sketch_core::{EncodedImage, RecognitionKind, RecognitionRecord, SupportedLanguage};
use sketch_store::{HistoryStore, KeyValueStore};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::editor::DrawingSurface;

/// Shown in place of a translation when the request fails.
pub const TRANSLATION_FALLBACK: &str = "Oops, translation failed.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Draw,
    Camera,
    Translate,
    History,
}

impl View {
    pub const ALL: [View; 4] = [View::Draw, View::Camera, View::Translate, View::History];

    pub fn title(&self) -> &'static str {
        match self {
            View::Draw => "Magic Canvas",
            View::Camera => "Camera",
            View::Translate => "Translator",
            View::History => "Collection",
        }
    }
}

/// What the user gets told when an action can't complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Notice {
    #[error("Draw something first! 🎨")]
    DrawFirst,

    #[error("Still thinking, hang on!")]
    Busy,

    #[error("Try again!")]
    SketchFailed,

    #[error("Identification failed. Try a clearer photo!")]
    PhotoFailed,
}

/// Shared "a request is running" flag. Cloning gives another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct ProcessingFlag(Arc<AtomicBool>);

impl ProcessingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Option<ProcessingGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(ProcessingGuard { flag: self.clone() })
    }
}

pub struct ViewShell<S> {
    view: View,
    current: Option<RecognitionRecord>,
    processing: ProcessingFlag,
    history: HistoryStore<S>,
    recognizer: Arc<dyn Recognizer>,
    translator: Arc<dyn Translator>,
}

impl<S: KeyValueStore> ViewShell<S> {
    pub fn new(
        history: HistoryStore<S>,
        recognizer: Arc<dyn Recognizer>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        info!("Starting shell with {} saved records", history.len());
        Self {
            view: View::default(),
            current: None,
            processing: ProcessingFlag::new(),
            history,
            recognizer,
            translator,
        }
    }

    pub fn navigate(&mut self, view: View) {
        debug!("Navigating to {:?}", view);
        self.view = view;
    }

    pub fn current_view(&self) -> View {
        self.view
    }

    pub fn header_title(&self) -> &'static str {
        self.view.title()
    }

    /// Share `flag` with other shells, so only one of them talks to the model at a time.
    pub fn with_processing_flag(mut self, flag: ProcessingFlag) -> Self {
        self.processing = flag;
        self
    }

    /// Handle a view can poll to show a spinner while a request runs.
    pub fn processing_flag(&self) -> ProcessingFlag {
        self.processing.clone()
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_set()
    }

    /// Identify what is drawn on `surface`, save it, and make it the current result.
    pub async fn identify_sketch(
        &mut self,
        surface: &DrawingSurface,
    ) -> Result<RecognitionRecord, Notice> {
        if !surface.has_content() {
            info!("Identify requested on an empty canvas");
            return Err(Notice::DrawFirst);
        }
        let _busy = self.start_processing()?;

        let image = surface.export_image().map_err(|err| {
            error!(error = %err, "failed to export sketch");
            Notice::SketchFailed
        })?;

        let identification = match self
            .recognizer
            .identify(&image, RecognitionKind::Sketch)
            .await
        {
            Ok(identification) => identification,
            Err(err) => {
                error!(error = %err, "sketch recognition failed");
                return Err(Notice::SketchFailed);
            }
        };

        let illustration = illustration_url(&identification.english_name, random_seed())
            .map(String::from);
        let record = RecognitionRecord::new(
            RecognitionKind::Sketch,
            identification.into_card(),
            image.to_data_uri(),
        )
        .with_generated_image(illustration);

        Ok(self.keep(record))
    }

    /// Identify the main object in a photo.
    pub async fn identify_photo(
        &mut self,
        image: &EncodedImage,
    ) -> Result<RecognitionRecord, Notice> {
        let _busy = self.start_processing()?;

        let identification = match self
            .recognizer
            .identify(image, RecognitionKind::Photo)
            .await
        {
            Ok(identification) => identification,
            Err(err) => {
                error!(error = %err, "photo recognition failed");
                return Err(Notice::PhotoFailed);
            }
        };

        let record = RecognitionRecord::new(
            RecognitionKind::Photo,
            identification.into_card(),
            image.to_data_uri(),
        );
        Ok(self.keep(record))
    }

    /// Translate `text` and/or the text in `image`. `Ok(None)` when there is nothing
    /// to translate; a failed request yields [`TRANSLATION_FALLBACK`].
    pub async fn translate(
        &mut self,
        text: &str,
        target: SupportedLanguage,
        image: Option<EncodedImage>,
    ) -> Result<Option<String>, Notice> {
        let request = TranslationRequest::new(text, target).with_image(image);
        if request.is_empty() {
            debug!("Nothing to translate");
            return Ok(None);
        }
        let _busy = self.start_processing()?;

        match self.translator.translate(&request).await {
            Ok(translated) => Ok(Some(translated)),
            Err(err) => {
                error!(error = %err, language = target.name(), "translation failed");
                Ok(Some(TRANSLATION_FALLBACK.to_string()))
            }
        }
    }

    /// Open a saved record as the current result.
    pub fn select_result(&mut self, id: &str) -> Option<&RecognitionRecord> {
        self.current = self.history.get(id).cloned();
        if self.current.is_none() {
            warn!(id, "no history record with this id");
        }
        self.current.as_ref()
    }

    pub fn close_result(&mut self) {
        self.current = None;
    }

    pub fn current_result(&self) -> Option<&RecognitionRecord> {
        self.current.as_ref()
    }

    pub fn clear_history(&mut self) -> anyhow::Result<()> {
        self.history.clear()
    }

    /// Saved records, newest first.
    pub fn history(&self) -> Vec<&RecognitionRecord> {
        self.history.newest_first().collect()
    }

    fn keep(&mut self, record: RecognitionRecord) -> RecognitionRecord {
        info!(
            "Identified {} {} ({})",
            record.emoji,
            record.english_name,
            record.kind.as_str()
        );
        if let Err(err) = self.history.append(record.clone()) {
            error!(error = ?err, id = %record.id, "failed to save history");
        }
        self.current = Some(record.clone());
        record
    }

    fn start_processing(&self) -> Result<ProcessingGuard, Notice> {
        self.processing.acquire().ok_or_else(|| {
            warn!("A request is already running");
            Notice::Busy
        })
    }
}

/// Holds the processing flag; dropping it clears the flag.
struct ProcessingGuard {
    flag: ProcessingFlag,
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.flag.0.store(false, Ordering::Release);
    }
}
