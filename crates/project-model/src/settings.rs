//! Persisted conversion settings.
//!
//! The settings document is a flat JSON object keyed by `slide_duration`,
//! `transition_duration`, `video_quality`, `bgm_volume`, `resolution`,
//! `auto_next`, `save_text` and `transition_effect`. Missing keys fall back to
//! their defaults; an unreadable document falls back to all defaults.

use std::path::{Path, PathBuf};

use slidecast_common::error::SlidecastError;

use crate::params::ParameterSet;

/// Errors reading or writing the settings document.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<SettingsError> for SlidecastError {
    fn from(err: SettingsError) -> Self {
        SlidecastError::config(err.to_string())
    }
}

/// Location of the settings document.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document. A missing file yields the defaults.
    pub fn load(&self) -> Result<ParameterSet, SettingsError> {
        if !self.path.exists() {
            return Ok(ParameterSet::default());
        }

        let json = std::fs::read_to_string(&self.path).map_err(|e| SettingsError::IoError {
            path: self.path.clone(),
            source: e,
        })?;

        serde_json::from_str(&json).map_err(|e| SettingsError::ParseError {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Load the document, falling back to defaults on any failure.
    pub fn load_or_default(&self) -> ParameterSet {
        match self.load() {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load settings, using defaults");
                ParameterSet::default()
            }
        }
    }

    /// Write the whole document.
    pub fn save(&self, params: &ParameterSet) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(params).map_err(|e| SettingsError::ParseError {
            path: self.path.clone(),
            source: e,
        })?;
        std::fs::write(&self.path, json).map_err(|e| SettingsError::IoError {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{QualityTier, Resolution, TransitionEffect};

    fn store(name: &str) -> SettingsStore {
        let dir = std::env::temp_dir().join(format!("slidecast_test_settings_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        SettingsStore::new(dir.join("config.json"))
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let store = store("missing");
        assert_eq!(store.load().unwrap(), ParameterSet::default());
    }

    #[test]
    fn test_save_writes_natural_scalar_types() {
        let store = store("scalars");
        let params = ParameterSet {
            slide_duration_secs: 3.5,
            resolution: Resolution::Explicit {
                width: 1920,
                height: 1080,
            },
            transition: TransitionEffect::SlideLeft,
            ..ParameterSet::default()
        };
        store.save(&params).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["slide_duration"], serde_json::json!(3.5));
        assert_eq!(raw["transition_duration"], serde_json::json!(1.0));
        assert_eq!(raw["video_quality"], serde_json::json!("high"));
        assert_eq!(raw["bgm_volume"], serde_json::json!(1.0));
        assert_eq!(raw["resolution"], serde_json::json!("1920x1080"));
        assert_eq!(raw["auto_next"], serde_json::json!(true));
        assert_eq!(raw["save_text"], serde_json::json!(true));
        assert_eq!(raw["transition_effect"], serde_json::json!("slideleft"));

        assert_eq!(store.load().unwrap(), params);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let store = store("partial");
        std::fs::write(store.path(), r#"{"bgm_volume": 0.4, "video_quality": "low"}"#).unwrap();

        let params = store.load().unwrap();
        assert_eq!(params.bgm_volume, 0.4);
        assert_eq!(params.quality, QualityTier::Low);
        assert_eq!(params.slide_duration_secs, 5.0);
        assert_eq!(params.resolution, Resolution::Auto);
    }

    #[test]
    fn test_string_numbers_from_older_documents() {
        let store = store("legacy");
        std::fs::write(
            store.path(),
            r#"{
                "slide_duration": "4",
                "transition_duration": "0.5",
                "video_quality": "中等质量",
                "bgm_volume": "0.8",
                "resolution": "自动",
                "auto_next": false,
                "save_text": false,
                "transition_effect": "随机效果"
            }"#,
        )
        .unwrap();

        let params = store.load().unwrap();
        assert_eq!(params.slide_duration_secs, 4.0);
        assert_eq!(params.transition_duration_secs, 0.5);
        assert_eq!(params.quality, QualityTier::Medium);
        assert_eq!(params.bgm_volume, 0.8);
        assert_eq!(params.resolution, Resolution::Auto);
        assert!(!params.auto_next);
        assert!(!params.save_text);
        assert_eq!(params.transition, TransitionEffect::Random);
    }

    #[test]
    fn test_non_numeric_duration_is_rejected() {
        let store = store("bad_number");
        std::fs::write(store.path(), r#"{"slide_duration": "five"}"#).unwrap();

        assert!(matches!(store.load(), Err(SettingsError::ParseError { .. })));
        assert_eq!(store.load_or_default(), ParameterSet::default());
    }

    #[test]
    fn test_unreadable_document_falls_back_to_defaults() {
        let store = store("garbage");
        std::fs::write(store.path(), "not json at all").unwrap();
        assert_eq!(store.load_or_default(), ParameterSet::default());
    }
}
