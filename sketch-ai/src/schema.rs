//! The JSON shape the model answers recognition requests with.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sketch_core::{RecognitionKind, WordCard};

use crate::AiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identification {
    pub english_name: String,
    pub chinese_name: String,
    pub phonetic: String,
    pub emoji: String,
    /// Echoed back by the model. Callers decide the real kind.
    #[serde(rename = "type", default)]
    pub kind: Option<RecognitionKind>,
    pub simple_sentence: String,
}

impl Identification {
    /// Parse and validate the model's text output.
    pub fn from_model_text(text: &str) -> Result<Self, AiError> {
        let body = strip_code_fence(text.trim());
        if body.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        let parsed: Identification = serde_json::from_str(body)?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Reject answers missing any required field; partial cards are never recorded.
    pub fn validate(&self) -> Result<(), AiError> {
        let mut fields = self.clone().into_card().blank_fields();
        if self.simple_sentence.trim().is_empty() {
            fields.push("simpleSentence");
        }
        if !fields.is_empty() {
            tracing::warn!(fields = ?fields, "model response has blank fields");
            return Err(AiError::InvalidResponse { fields });
        }
        Ok(())
    }

    pub fn into_card(self) -> WordCard {
        WordCard {
            english_name: self.english_name,
            chinese_name: self.chinese_name,
            phonetic: self.phonetic,
            emoji: self.emoji,
            simple_sentence: Some(self.simple_sentence),
        }
    }
}

/// Response schema handed to the model so it answers with an [`Identification`].
pub fn response_schema(kind: RecognitionKind) -> Value {
    let (english, chinese, phonetic, sentence) = match kind {
        RecognitionKind::Sketch => (
            "English name of the item.",
            "Simplified Chinese name.",
            "IPA phonetic transcription of the English word.",
            "A simple 3-5 word sentence using the word for a toddler.",
        ),
        RecognitionKind::Photo => (
            "Main object name in English.",
            "Main object name in Chinese.",
            "IPA phonetic transcription.",
            "A simple English sentence describing the object for a child.",
        ),
    };

    json!({
        "type": "OBJECT",
        "properties": {
            "englishName": { "type": "STRING", "description": english },
            "chineseName": { "type": "STRING", "description": chinese },
            "phonetic": { "type": "STRING", "description": phonetic },
            "emoji": { "type": "STRING", "description": "Representative emoji." },
            "type": {
                "type": "STRING",
                "enum": [kind.as_str()],
                "description": format!("Always '{}'", kind.as_str())
            },
            "simpleSentence": { "type": "STRING", "description": sentence }
        },
        "required": ["englishName", "chineseName", "phonetic", "emoji", "simpleSentence"]
    })
}

// Models sometimes wrap JSON in a markdown fence even when asked not to
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
