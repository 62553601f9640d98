//! Generated "real life" illustration for a recognized sketch.
//!
//! Pure decoration: when a URL can't be built the result is shown without one,
//! and when the image fails to load the UI swaps in the placeholder.

use rand::Rng;
use url::Url;

pub const ILLUSTRATION_BASE_URL: &str = "https://image.pollinations.ai/prompt/";
pub const PLACEHOLDER_BASE_URL: &str = "https://placehold.co/400x400";

/// Seeds are drawn from `0..SEED_RANGE`.
pub const SEED_RANGE: u32 = 1000;

pub fn illustration_prompt(english_name: &str) -> String {
    format!("photorealistic cute {english_name} object white background")
}

/// `https://image.pollinations.ai/prompt/<prompt>?nologo=true&seed=<seed>`
pub fn illustration_url(english_name: &str, seed: u32) -> Option<Url> {
    let mut url = Url::parse(ILLUSTRATION_BASE_URL).ok()?;
    {
        let mut segments = url.path_segments_mut().ok()?;
        segments.pop_if_empty().push(&illustration_prompt(english_name));
    }
    url.query_pairs_mut()
        .append_pair("nologo", "true")
        .append_pair("seed", &seed.to_string());
    Some(url)
}

pub fn placeholder_url(english_name: &str) -> Option<Url> {
    Url::parse_with_params(PLACEHOLDER_BASE_URL, &[("text", english_name)]).ok()
}

pub fn random_seed() -> u32 {
    rand::rng().random_range(0..SEED_RANGE)
}
