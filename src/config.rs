use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

use crate::overlay::{OverlaySettings, DEFAULT_WINDOW_SECS};

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable carrying the required service credential.
pub const API_KEY_ENV: &str = "SKYSCAN_API_KEY";

#[derive(Debug, Deserialize, Default)]
struct SkyscanConfigFile {
    model: Option<String>,
    api_base: Option<String>,
    overlay: Option<OverlayConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct OverlayConfigFile {
    window_secs: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct SkyscanConfig {
    pub model: String,
    pub api_base: String,
    /// Service credential, environment-only (`SKYSCAN_API_KEY`), never read
    /// from the config file. `None` is not a load error: the client raises
    /// the configuration error at first use, so exporting the key later
    /// makes the next call succeed.
    pub api_key: Option<String>,
    pub overlay: OverlaySettings,
}

impl SkyscanConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("SKYSCAN_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: SkyscanConfigFile) -> Self {
        let model = file.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base = file
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let overlay = OverlaySettings {
            window_secs: file
                .overlay
                .and_then(|overlay| overlay.window_secs)
                .unwrap_or(DEFAULT_WINDOW_SECS),
        };
        Self {
            model,
            api_base,
            api_key: None,
            overlay,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(model) = std::env::var("SKYSCAN_MODEL") {
            if !model.trim().is_empty() {
                self.model = model;
            }
        }
        if let Ok(base) = std::env::var("SKYSCAN_API_BASE") {
            if !base.trim().is_empty() {
                self.api_base = base;
            }
        }
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
        if let Ok(window) = std::env::var("SKYSCAN_OVERLAY_WINDOW_SECS") {
            let secs: f64 = window.parse().map_err(|_| {
                anyhow!("SKYSCAN_OVERLAY_WINDOW_SECS must be a number of seconds")
            })?;
            self.overlay.window_secs = secs;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(anyhow!("model must not be empty"));
        }
        url::Url::parse(&self.api_base)
            .map_err(|e| anyhow!("api_base is not a valid url: {}", e))?;
        if !(self.overlay.window_secs > 0.0) {
            return Err(anyhow!("overlay window_secs must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for SkyscanConfig {
    fn default() -> Self {
        Self::from_file(SkyscanConfigFile::default())
    }
}

fn read_config_file(path: &Path) -> Result<SkyscanConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
