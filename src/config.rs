// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Caixa", "caixa"));

pub const API_BASE_ENV: &str = "CAIXA_API_BASE";
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Blank overrides are ignored; a trailing slash is dropped so routes join cleanly.
    pub fn with_api_base(mut self, api_base: Option<&str>) -> Self {
        if let Some(base) = api_base.map(str::trim).filter(|s| !s.is_empty()) {
            self.api_base = base.trim_end_matches('/').to_string();
        }
        self
    }
}

pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    Ok(proj.config_dir().join("config.json"))
}

/// Effective configuration: file (or defaults), then the environment override.
pub fn load() -> Result<Config> {
    let path = config_path()?;
    let env_base = std::env::var(API_BASE_ENV).ok();
    Ok(load_from(&path)?.with_api_base(env_base.as_deref()))
}

pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let data =
        fs::read_to_string(path).with_context(|| format!("Read config {}", path.display()))?;
    let cfg: Config = serde_json::from_str(&data)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    let file_base = cfg.api_base.clone();
    Ok(Config {
        api_base: DEFAULT_API_BASE.to_string(),
        ..cfg
    }
    .with_api_base(Some(file_base.as_str())))
}

pub fn save_to(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config dir")?;
    }
    fs::write(path, serde_json::to_string_pretty(cfg)?)
        .with_context(|| format!("Write config {}", path.display()))?;
    Ok(())
}
