// Text-to-speech capability used by the result card and the translator.

use tracing::info;

/// Language tag used for the word card.
pub const ENGLISH_VOICE: &str = "en-US";

/// Slower than normal so children can follow the pronunciation.
pub const PRONUNCIATION_RATE: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// BCP 47 tag or bare language code.
    pub lang: String,
    pub rate: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: lang.into(),
            rate: 1.0,
        }
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }
}

pub trait SpeechSynthesizer {
    fn speak(&mut self, utterance: Utterance);

    /// Stop whatever is being spoken.
    fn cancel(&mut self);
}

/// Speech backend for the terminal: writes utterances to the log.
#[derive(Debug, Default)]
pub struct TracingSpeech;

impl SpeechSynthesizer for TracingSpeech {
    fn speak(&mut self, utterance: Utterance) {
        info!(
            lang = %utterance.lang,
            rate = utterance.rate,
            "🔊 {}",
            utterance.text
        );
    }

    fn cancel(&mut self) {}
}
