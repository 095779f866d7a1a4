//! Editor settings, read from `<config dir>/photo-annotate/config.json`.
//!
//! Every field has a default, so the file may name only what it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::canvas::Color4;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Distance from an edge, in overlay-local pixels, that still grabs a corner.
    pub edge_threshold: f32,
    pub overlay_size: (f32, f32),
    pub overlay_placeholder: String,
    pub overlay_font_size: f32,
    pub stroke_width: f32,
    pub palette: Vec<Color4>,
    /// Keyboard rotation step for overlays, in degrees.
    pub rotate_step_degrees: f32,
    pub log_level: LogLevel,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            edge_threshold: 44.0,
            overlay_size: (200.0, 50.0),
            overlay_placeholder: "Tap to edit. Pinch to scale and rotate.".to_string(),
            overlay_font_size: 18.0,
            stroke_width: 4.0,
            palette: vec![Color4::RED, Color4::WHITE, Color4::BLACK],
            rotate_step_degrees: 5.0,
            log_level: LogLevel::Info,
        }
    }
}

impl EditorConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("photo-annotate").join("config.json"))
    }

    /// Reads a config file; `Ok(None)` when it does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Loads the default config file, falling back to defaults. Runs before the logger is
    /// up, so failures are returned alongside the config for the caller to report.
    pub fn load_or_default() -> (Self, Option<String>) {
        let Some(path) = Self::default_path() else {
            return (Self::default(), None);
        };
        match Self::load_from(&path) {
            Ok(Some(config)) => (config, None),
            Ok(None) => (Self::default(), None),
            Err(e) => (
                Self::default(),
                Some(format!("ignoring {}: {}", path.display(), e)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{ "edge_threshold": 12.5, "log_level": "debug" }"#).unwrap();
        assert_eq!(config.edge_threshold, 12.5);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.overlay_size, (200.0, 50.0));
        assert_eq!(config.palette.len(), 3);
    }

    #[test]
    fn test_load_from_missing_and_malformed() {
        let dir = std::env::temp_dir().join(format!("photo-annotate-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let missing = dir.join("missing.json");
        assert!(EditorConfig::load_from(&missing).unwrap().is_none());

        let bad = dir.join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(EditorConfig::load_from(&bad).is_err());

        let good = dir.join("good.json");
        std::fs::write(&good, r#"{ "stroke_width": 9.0 }"#).unwrap();
        let config = EditorConfig::load_from(&good).unwrap().unwrap();
        assert_eq!(config.stroke_width, 9.0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::default().to_level_filter(), log::LevelFilter::Info);
    }
}
