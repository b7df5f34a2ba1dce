//! Application configuration.
//!
//! This is the tool-level configuration (external tool locations, timeouts,
//! file locations). The operator-facing conversion parameters live in the
//! settings document of `slidecast-project-model`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// External executables.
    pub tools: ToolPaths,

    /// Slide export behaviour.
    pub rasterizer: RasterizerConfig,

    /// Files and directories used by a run.
    pub paths: RunPaths,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Names or paths of the external programs Slidecast drives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub soffice: PathBuf,
    pub pdftoppm: PathBuf,
    pub pdfinfo: PathBuf,
}

/// Slide export parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterizerConfig {
    /// Rendering density used when no explicit resolution is requested.
    pub native_dpi: u32,

    /// Upper bound on how long a single export step may take.
    pub export_timeout_secs: u64,

    /// Interval between checks for an exported file.
    pub poll_interval_ms: u64,

    /// Re-encode every exported PNG with maximum compression.
    pub optimize_png: bool,
}

/// Locations of run artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunPaths {
    /// Temporary working directory, cleared at the start of every run.
    pub work_dir: PathBuf,

    /// Encoder diagnostic log, truncated at the start of every run.
    pub log_file: PathBuf,

    /// Slide text transcript.
    pub transcript_file: PathBuf,

    /// Persisted conversion settings.
    pub settings_file: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "slidecast=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            soffice: PathBuf::from("soffice"),
            pdftoppm: PathBuf::from("pdftoppm"),
            pdfinfo: PathBuf::from("pdfinfo"),
        }
    }
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self {
            native_dpi: 96,
            export_timeout_secs: 60,
            poll_interval_ms: 100,
            optimize_png: true,
        }
    }
}

impl Default for RunPaths {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("TEMP"),
            log_file: PathBuf::from("ffmpeg_log.txt"),
            transcript_file: PathBuf::from("ppt_content.txt"),
            settings_file: PathBuf::from("config.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl RasterizerConfig {
    pub fn export_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.export_timeout_secs.max(1))
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("slidecast").join("config.json")
}
