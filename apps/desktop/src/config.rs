use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::HttpSourceConfig;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080/".into(),
            endpoint: client_core::transport::DEFAULT_ENDPOINT.into(),
            timeout_secs: client_core::transport::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Settings {
    pub fn source_config(&self) -> HttpSourceConfig {
        HttpSourceConfig {
            base_url: self.api_url.clone(),
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

/// Defaults, then the TOML file, then environment variables.
///
/// An explicitly given file must exist; the default `catalog.toml` is
/// optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            apply_file(&mut settings, &raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
                apply_file(&mut settings, &raw)
                    .with_context(|| format!("invalid config file '{DEFAULT_CONFIG_FILE}'"))?;
            }
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file_cfg.endpoint {
        settings.endpoint = v;
    }
    if let Some(v) = file_cfg.timeout_secs {
        settings.timeout_secs = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("CATALOG_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = var("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = var("APP__ENDPOINT") {
        settings.endpoint = v;
    }

    if let Some(v) = var("APP__TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.timeout_secs = parsed;
        }
    }
}
