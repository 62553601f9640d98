//! Gemini `generateContent` client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use sketch_core::{EncodedImage, RecognitionKind};
use tracing::{debug, error, info, warn};

use crate::config::{AiConfig, API_KEY_VAR};
use crate::schema::{response_schema, Identification};
use crate::{AiError, Recognizer, TranslationRequest, Translator, TRANSLATION_FAILED};

const SKETCH_PROMPT: &str =
    "Identify this simple sketch. It could be an animal, fruit, vehicle, or daily object. Be generous.";
const PHOTO_PROMPT: &str =
    "Identify the main object in this photo for a child's learning. Ignore background clutter.";
const TRANSCRIBE_PROMPT: &str =
    "First, transcribe any text found in the image. If no text, describe the image briefly.";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: AiConfig,
}

impl GeminiClient {
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        if !config.has_credential() {
            // Only reported here; each request fails on its own later.
            error!("Missing {} in environment", API_KEY_VAR);
        }
        info!(model = %config.model, "creating Gemini client");

        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.config.base_url, self.config.model)
    }

    /// POST a request body and return the model's text, if it produced any.
    async fn generate(&self, body: &Value) -> Result<Option<String>, AiError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AiError::MissingApiKey { var: API_KEY_VAR })?;

        debug!(endpoint = %self.endpoint(), "sending generateContent request");
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let body = error_message(&text).unwrap_or(text);
            warn!(status = status.as_u16(), body = %body, "Gemini request failed");
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response_text(&text)
    }
}

#[async_trait]
impl Recognizer for GeminiClient {
    async fn identify(
        &self,
        image: &EncodedImage,
        kind: RecognitionKind,
    ) -> Result<Identification, AiError> {
        info!(kind = kind.as_str(), bytes = image.bytes().len(), "identifying image");
        let body = recognition_body(image, kind);
        let text = self.generate(&body).await?.ok_or(AiError::EmptyResponse)?;
        Identification::from_model_text(&text)
    }
}

#[async_trait]
impl Translator for GeminiClient {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, AiError> {
        info!(
            language = request.target.name(),
            has_image = request.image.is_some(),
            "translating"
        );
        let body = translation_body(request);
        let text = self.generate(&body).await?;
        Ok(text
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| TRANSLATION_FAILED.to_string()))
    }
}

fn inline_image(image: &EncodedImage) -> Value {
    json!({
        "inline_data": {
            "mime_type": image.mime(),
            "data": image.to_base64()
        }
    })
}

/// Request body for identifying a sketch or photo.
pub fn recognition_body(image: &EncodedImage, kind: RecognitionKind) -> Value {
    let prompt = match kind {
        RecognitionKind::Sketch => SKETCH_PROMPT,
        RecognitionKind::Photo => PHOTO_PROMPT,
    };

    json!({
        "contents": [{
            "role": "user",
            "parts": [inline_image(image), { "text": prompt }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(kind)
        }
    })
}

/// Request body for translating text, an image, or both.
pub fn translation_body(request: &TranslationRequest) -> Value {
    let mut parts = Vec::new();
    if let Some(image) = &request.image {
        parts.push(inline_image(image));
        parts.push(json!({ "text": TRANSCRIBE_PROMPT }));
    }

    let instruction = format!(
        "Translate the following to {}. Return ONLY the translated text.",
        request.target.name()
    );
    if !request.text.is_empty() {
        parts.push(json!({ "text": format!("Input text: \"{}\". {}", request.text, instruction) }));
    } else if request.image.is_some() {
        parts.push(json!({ "text": format!("Then, {}", instruction) }));
    }

    json!({
        "contents": [{ "role": "user", "parts": parts }]
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Concatenated text parts of the first candidate.
fn response_text(body: &str) -> Result<Option<String>, AiError> {
    let payload: GenerateContentResponse = serde_json::from_str(body)?;
    let text: String = payload
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.is_empty() {
        debug!("model returned no text");
        return Ok(None);
    }
    Ok(Some(text))
}

fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_core::SupportedLanguage;

    fn png() -> EncodedImage {
        EncodedImage::png(vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn test_recognition_body_for_sketch() {
        let body = recognition_body(&png(), RecognitionKind::Sketch);
        let parts = &body["contents"][0]["parts"];

        assert_eq!(parts[0]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[0]["inline_data"]["data"], "iVBORw==");
        assert_eq!(parts[1]["text"], SKETCH_PROMPT);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["properties"]["type"]["enum"][0],
            "sketch"
        );
    }

    #[test]
    fn test_photo_keeps_its_own_mime() {
        let jpeg = EncodedImage::new("image/jpeg", vec![0xff, 0xd8, 0xff]);
        let body = recognition_body(&jpeg, RecognitionKind::Photo);
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[1]["text"], PHOTO_PROMPT);
    }

    #[test]
    fn test_translation_body_text_only() {
        let request = TranslationRequest::new("good morning", SupportedLanguage::German);
        let body = translation_body(&request);
        let parts = body["contents"][0]["parts"].as_array().unwrap();

        assert_eq!(parts.len(), 1);
        assert_eq!(
            parts[0]["text"],
            "Input text: \"good morning\". Translate the following to German. Return ONLY the translated text."
        );
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_translation_body_image_only() {
        let request = TranslationRequest::new("", SupportedLanguage::Japanese).with_image(Some(png()));
        let body = translation_body(&request);
        let parts = body["contents"][0]["parts"].as_array().unwrap();

        assert_eq!(parts.len(), 3);
        assert!(parts[0].get("inline_data").is_some());
        assert_eq!(parts[1]["text"], TRANSCRIBE_PROMPT);
        assert_eq!(
            parts[2]["text"],
            "Then, Translate the following to Japanese. Return ONLY the translated text."
        );
    }

    #[test]
    fn test_translation_body_text_and_image() {
        let request = TranslationRequest::new("menu", SupportedLanguage::Spanish).with_image(Some(png()));
        let body = translation_body(&request);
        let parts = body["contents"][0]["parts"].as_array().unwrap();

        assert_eq!(parts.len(), 3);
        assert!(parts[2]["text"].as_str().unwrap().starts_with("Input text: \"menu\"."));
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Hola"},{"text":" mundo"}]}}]}"#;
        assert_eq!(response_text(body).unwrap().as_deref(), Some("Hola mundo"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        assert_eq!(response_text(r#"{"candidates":[]}"#).unwrap(), None);
        assert_eq!(response_text(r#"{}"#).unwrap(), None);
        assert_eq!(response_text(r#"{"candidates":[{}]}"#).unwrap(), None);
    }

    #[test]
    fn test_malformed_response_is_parse_error() {
        assert!(matches!(response_text("<html>"), Err(AiError::Parse(_))));
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body).as_deref(), Some("API key not valid."));
        assert_eq!(error_message("oops"), None);
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = GeminiClient::new(AiConfig::default()).unwrap();
        let err = client.identify(&png(), RecognitionKind::Sketch).await.unwrap_err();
        assert!(matches!(err, AiError::MissingApiKey { var: "API_KEY" }));

        let request = TranslationRequest::new("hi", SupportedLanguage::Korean);
        assert!(matches!(
            client.translate(&request).await,
            Err(AiError::MissingApiKey { .. })
        ));
    }
}
