// Translation target languages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportedLanguage {
    Chinese,
    #[default]
    English,
    Korean,
    German,
    Italian,
    French,
    Spanish,
    Japanese,
}

impl SupportedLanguage {
    /// Picker order.
    pub const ALL: [SupportedLanguage; 8] = [
        SupportedLanguage::Chinese,
        SupportedLanguage::English,
        SupportedLanguage::Korean,
        SupportedLanguage::German,
        SupportedLanguage::Italian,
        SupportedLanguage::French,
        SupportedLanguage::Spanish,
        SupportedLanguage::Japanese,
    ];

    /// English name, as used in prompts.
    pub fn name(&self) -> &'static str {
        match self {
            SupportedLanguage::Chinese => "Chinese",
            SupportedLanguage::English => "English",
            SupportedLanguage::Korean => "Korean",
            SupportedLanguage::German => "German",
            SupportedLanguage::Italian => "Italian",
            SupportedLanguage::French => "French",
            SupportedLanguage::Spanish => "Spanish",
            SupportedLanguage::Japanese => "Japanese",
        }
    }

    /// Language code handed to speech synthesis.
    pub fn code(&self) -> &'static str {
        match self {
            SupportedLanguage::Chinese => "zh",
            SupportedLanguage::English => "en",
            SupportedLanguage::Korean => "ko",
            SupportedLanguage::German => "de",
            SupportedLanguage::Italian => "it",
            SupportedLanguage::French => "fr",
            SupportedLanguage::Spanish => "es",
            SupportedLanguage::Japanese => "ja",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            SupportedLanguage::Chinese => "🇨🇳",
            SupportedLanguage::English => "🇺🇸",
            SupportedLanguage::Korean => "🇰🇷",
            SupportedLanguage::German => "🇩🇪",
            SupportedLanguage::Italian => "🇮🇹",
            SupportedLanguage::French => "🇫🇷",
            SupportedLanguage::Spanish => "🇪🇸",
            SupportedLanguage::Japanese => "🇯🇵",
        }
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts either the name ("Korean") or the code ("ko"), any case.
impl FromStr for SupportedLanguage {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SupportedLanguage::ALL
            .into_iter()
            .find(|lang| {
                lang.name().eq_ignore_ascii_case(wanted) || lang.code().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownLanguage(wanted.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("unsupported language: {0}")]
pub struct UnknownLanguage(pub String);
