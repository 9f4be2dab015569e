// Global configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the ffmpeg executable
pub const FFMPEG_ENV: &str = "FFSCAN_FFMPEG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ffmpeg: FfmpegConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FfmpegConfig {
    /// Explicit ffmpeg executable (otherwise looked up on PATH)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Output container used by `encode` when `--format` is not given
    #[serde(default = "default_format")]
    pub format: String,

    /// Default `-qscale` value
    #[serde(default)]
    pub qscale: Option<String>,

    /// Default `-strict` value (e.g. "experimental" for older aac encoders)
    #[serde(default)]
    pub strict: Option<String>,

    /// Seconds into the source used by `frame` when `--offset` is not given
    #[serde(default = "default_frame_offset")]
    pub frame_offset_secs: f32,
}

fn default_format() -> String {
    "mp4".to_string()
}

fn default_frame_offset() -> f32 {
    1.0
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            qscale: None,
            strict: None,
            frame_offset_secs: default_frame_offset(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("ffscan")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("ffscan")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();

            // Try to save the default config, but don't fail if we can't
            if let Err(e) = config.save() {
                tracing::warn!("Could not create default config file: {:#}", e);
                tracing::warn!(
                    "Using built-in defaults. Run 'ffscan init-config' to create a config file."
                );
            }

            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Check if config file exists
    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }

    /// ffmpeg executable to run: `FFSCAN_FFMPEG`, then `[ffmpeg] path`, then `ffmpeg`
    pub fn ffmpeg_program(&self) -> String {
        self.resolve_program(std::env::var(FFMPEG_ENV).ok())
    }

    fn resolve_program(&self, env_override: Option<String>) -> String {
        env_override
            .filter(|p| !p.trim().is_empty())
            .or_else(|| {
                self.ffmpeg
                    .path
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "ffmpeg".to_string())
    }
}
