//! Editor configuration.
//!
//! Configuration is stored as JSON or TOML, chosen by file extension.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::layout::SplitPercent;
use crate::render::Theme;

/// Largest file accepted by import: 15 MiB.
pub const DEFAULT_MAX_IMPORT_BYTES: u64 = 15 * 1024 * 1024;

/// Tunables for an editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Preview theme passed to the renderer.
    pub theme: Theme,
    /// Whether editor scrolling drives the preview on startup.
    pub sync_scroll: bool,
    /// Initial editor share of the split, clamped to the usable band.
    pub initial_split_percent: SplitPercent,
    /// Quiet period after the last edit before a render request is issued.
    pub debounce_ms: u64,
    /// Window in which preview scroll events are treated as echoes.
    pub scroll_suppress_ms: u64,
    /// Delay before the relayout signal after editor fullscreen changes.
    pub relayout_settle_ms: u64,
    /// How long copy confirmation stays visible.
    pub copy_feedback_ms: u64,
    pub max_import_bytes: u64,
    /// Base URL of the rendering service.
    pub renderer_endpoint: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            sync_scroll: true,
            initial_split_percent: SplitPercent::default(),
            debounce_ms: 300,
            scroll_suppress_ms: 50,
            relayout_settle_ms: 300,
            copy_feedback_ms: 2000,
            max_import_bytes: DEFAULT_MAX_IMPORT_BYTES,
            renderer_endpoint: "http://127.0.0.1:5000".to_owned(),
        }
    }
}

impl EditorConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn scroll_suppress_window(&self) -> Duration {
        Duration::from_millis(self.scroll_suppress_ms)
    }

    pub fn relayout_settle_delay(&self) -> Duration {
        Duration::from_millis(self.relayout_settle_ms)
    }

    pub fn copy_feedback_duration(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }

    /// Load from a `.json` or `.toml` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        match Format::of(path)? {
            Format::Json => Ok(serde_json::from_str(&raw)?),
            Format::Toml => Ok(toml::from_str(&raw)?),
        }
    }

    /// Write to a `.json` or `.toml` file, replacing it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let raw = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading editor config");
                Self::from_path(path)
            }
            _ => Ok(Self::default()),
        }
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_owned(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdview.toml");
        std::fs::write(&path, "theme = \"dark\"\ninitial_split_percent = 95.0\n").unwrap();

        let config = EditorConfig::from_path(&path).unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.initial_split_percent.get(), 80.0);
        assert_eq!(config.debounce_ms, 300);
        assert!(config.sync_scroll);
    }

    #[test]
    fn test_json_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdview.json");
        let config = EditorConfig {
            sync_scroll: false,
            debounce_ms: 120,
            ..EditorConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(EditorConfig::from_path(&path).unwrap(), config);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdview.yaml");
        std::fs::write(&path, "theme: dark").unwrap();
        assert!(matches!(
            EditorConfig::from_path(&path),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "yaml"
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = EditorConfig::load_or_default(Some(PathBuf::from("/nonexistent/mdview.toml")))
            .unwrap();
        assert_eq!(config, EditorConfig::default());
    }
}
