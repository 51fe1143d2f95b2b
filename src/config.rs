//! Configuration persistence for shotscan settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::capture::CaptureConfig;
use crate::ocr::OcrOptions;
use crate::qr::QrOptions;

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV: &str = "SHOTSCAN_CONFIG";

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotscanConfig {
    /// Tesseract language spec, e.g. `eng` or `eng+hin`
    pub language: String,
    /// Whether to look for a QR code before running OCR
    pub qr_enabled: bool,
    /// Where to keep the screenshot (None = a temp file per run)
    pub image_path: Option<PathBuf>,
    pub capture: CaptureConfig,
    pub qr: QrOptions,
    pub ocr: OcrOptions,
}

impl Default for ShotscanConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            qr_enabled: true,
            image_path: None,
            capture: CaptureConfig::default(),
            qr: QrOptions::default(),
            ocr: OcrOptions::default(),
        }
    }
}

impl ShotscanConfig {
    /// `$SHOTSCAN_CONFIG`, or `config.json` under the user config dir
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("shotscan").join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::default_path().context("No config directory available")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
