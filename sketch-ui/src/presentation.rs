// The result card shown after a successful identification.
// Picks the picture to show and handles pronunciation.

use sketch_ai::{illustration_url, placeholder_url, random_seed};
use sketch_core::{RecognitionKind, RecognitionRecord, SupportedLanguage};
use tracing::debug;

use crate::speech::{SpeechSynthesizer, Utterance, ENGLISH_VOICE, PRONUNCIATION_RATE};

#[derive(Debug, Clone, PartialEq)]
pub struct ResultPresentation {
    record: RecognitionRecord,
    display_image: String,
}

impl ResultPresentation {
    pub fn new(record: RecognitionRecord) -> Self {
        let display_image = choose_display_image(&record, random_seed);
        Self {
            record,
            display_image,
        }
    }

    pub fn record(&self) -> &RecognitionRecord {
        &self.record
    }

    /// URL or data URI of the picture on the card.
    pub fn display_image(&self) -> &str {
        &self.display_image
    }

    /// The picture failed to load; fall back to the text placeholder.
    pub fn image_failed(&mut self) {
        if let Some(url) = placeholder_url(&self.record.english_name) {
            debug!(
                "Display image failed for {}, using placeholder",
                self.record.english_name
            );
            self.display_image = url.into();
        }
    }

    /// `/ˈæpəl/`
    pub fn phonetic_label(&self) -> String {
        format!("/{}/", self.record.phonetic)
    }

    /// Say the English name, interrupting anything already playing.
    pub fn pronounce(&self, speech: &mut dyn SpeechSynthesizer) {
        speech.cancel();
        speech.speak(
            Utterance::new(&self.record.english_name, ENGLISH_VOICE).with_rate(PRONUNCIATION_RATE),
        );
    }

    pub fn read_sentence(&self, speech: &mut dyn SpeechSynthesizer) {
        if let Some(sentence) = self.record.simple_sentence.as_deref() {
            speech.cancel();
            speech.speak(Utterance::new(sentence, ENGLISH_VOICE).with_rate(PRONUNCIATION_RATE));
        }
    }
}

/// Play back a translation in the voice of its target language. Empty text is skipped.
pub fn speak_translation(
    speech: &mut dyn SpeechSynthesizer,
    text: &str,
    language: SupportedLanguage,
) {
    if text.is_empty() {
        return;
    }
    speech.speak(Utterance::new(text, language.code()));
}

fn choose_display_image(record: &RecognitionRecord, seed: impl FnOnce() -> u32) -> String {
    if let Some(generated) = &record.generated_image {
        return generated.clone();
    }
    if record.kind == RecognitionKind::Sketch {
        if let Some(url) = illustration_url(&record.english_name, seed()) {
            return url.into();
        }
    }
    record.source_image.clone()
}
