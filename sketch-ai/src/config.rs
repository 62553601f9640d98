//! Model client configuration, read from environment variables.

pub const API_KEY_VAR: &str = "API_KEY";
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "MAGIC_SKETCH_MODEL";
pub const BASE_URL_VAR: &str = "MAGIC_SKETCH_GEMINI_BASE_URL";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    /// `None` when no credential is configured. Requests then fail one by one.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl AiConfig {
    /// Build the config from the process environment.
    ///
    /// - `API_KEY`, falling back to `GEMINI_API_KEY`
    /// - `MAGIC_SKETCH_MODEL`: default `gemini-2.5-flash`
    /// - `MAGIC_SKETCH_GEMINI_BASE_URL`: default Google endpoint
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AiConfig::from_env`] with an explicit variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = non_blank(API_KEY_VAR).or_else(|| non_blank(GEMINI_API_KEY_VAR));
        let model = non_blank(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = non_blank(BASE_URL_VAR)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            api_key,
            model,
            base_url,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}
