// App configuration from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use sketch_ai::AiConfig;
use tracing::warn;

pub const DATA_DIR_VAR: &str = "MAGIC_SKETCH_DATA_DIR";
pub const CANVAS_SIZE_VAR: &str = "MAGIC_SKETCH_CANVAS_SIZE";
pub const SCALE_VAR: &str = "MAGIC_SKETCH_SCALE";

pub const DEFAULT_DATA_DIR: &str = ".magic-sketch";
/// Logical width and height of the square drawing area.
pub const DEFAULT_CANVAS_SIZE: f32 = 360.0;
/// Device pixel ratio assumed when there is no real display.
pub const DEFAULT_SCALE: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Where the history store keeps its files.
    pub data_dir: PathBuf,
    pub canvas_size: f32,
    pub scale: f32,
    pub ai: AiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            canvas_size: DEFAULT_CANVAS_SIZE,
            scale: DEFAULT_SCALE,
            ai: AiConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let canvas_size = parse_positive(&lookup, CANVAS_SIZE_VAR, DEFAULT_CANVAS_SIZE);
        let scale = parse_positive(&lookup, SCALE_VAR, DEFAULT_SCALE);

        Self {
            data_dir,
            canvas_size,
            scale,
            ai: AiConfig::from_lookup(&lookup),
        }
    }
}

fn parse_positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + PartialOrd + Default + Copy,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => value,
        _ => {
            warn!(key, value = %raw, "ignoring invalid setting");
            default
        }
    }
}
