//! Encoded image payloads and data URIs.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;

pub const PNG_MIME: &str = "image/png";

/// An image already encoded in a portable format (PNG, JPEG, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    mime: String,
    bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(PNG_MIME, bytes)
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.to_base64())
    }

    pub fn from_data_uri(uri: &str) -> Result<Self, ImageError> {
        let rest = uri.strip_prefix("data:").ok_or(ImageError::NotDataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(ImageError::NotDataUri)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| ImageError::NotBase64 {
                header: header.to_string(),
            })?;
        if mime.is_empty() {
            return Err(ImageError::NotDataUri);
        }
        let bytes = BASE64.decode(payload.trim())?;
        Ok(Self::new(mime, bytes))
    }
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("not a data URI")]
    NotDataUri,

    #[error("data URI is not base64 encoded: {header}")]
    NotBase64 { header: String },

    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
}
