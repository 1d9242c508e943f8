//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - A missing default file means defaults; an explicitly named file must exist.
//!
//! Unknown XML fields are rejected so misconfigurations surface early.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::CONFIG_ENV;
use super::paths::default_config_path;
use super::types::{Config, LogLevel, OnCopyError};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    json: Option<bool>,
    preserve_metadata: Option<bool>,
    on_copy_error: Option<String>,
}

fn trimmed(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();
    if let Some(s) = trimmed(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    cfg.log_file = trimmed(parsed.log_file.as_deref()).map(PathBuf::from);
    cfg.json = parsed.json.unwrap_or(false);
    cfg.preserve_metadata = parsed.preserve_metadata.unwrap_or(false);
    if let Some(s) = trimmed(parsed.on_copy_error.as_deref()) {
        cfg.on_copy_error = s.parse::<OnCopyError>().map_err(anyhow::Error::msg)?;
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file path (quick_xml).
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid config xml '{}'", path.display()))
}

/// Resolve and load the effective config.
///
/// Order: `explicit` path, then `$MOVE_FILES_CONFIG`, then the platform default.
/// Only the platform default may be absent; defaults are used in that case.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let named = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()).map(PathBuf::from));
    if let Some(path) = named {
        if !path.is_file() {
            bail!("config file '{}' does not exist", path.display());
        }
        debug!(path = %path.display(), "loading config");
        return load_config_from_xml_path(&path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => {
            debug!(path = %path.display(), "loading config");
            load_config_from_xml_path(&path)
        }
        _ => Ok(Config::default()),
    }
}
