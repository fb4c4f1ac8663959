//! Persisted tool settings: the last-used transparency value and the
//! live-preview flag, carried between sessions in a TOML file.
//!
//! Precedence on load: built-in defaults, then the settings file if it
//! exists and parses, then `TRANSPARENCY__*` environment overrides.

use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared::domain::TransparencyValue;

pub const VALUE_ENV_VAR: &str = "TRANSPARENCY__VALUE";
pub const PREVIEW_ENV_VAR: &str = "TRANSPARENCY__PREVIEW";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub transparency: TransparencyValue,
    pub preview_enabled: bool,
}

pub fn load_settings(path: &Path) -> ToolSettings {
    let mut settings = ToolSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<ToolSettings>(&raw) {
            settings = file_cfg;
        }
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

fn apply_env_overrides(settings: &mut ToolSettings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var(VALUE_ENV_VAR) {
        if let Some(value) = v.parse::<u8>().ok().and_then(|p| TransparencyValue::new(p).ok()) {
            settings.transparency = value;
        }
    }

    if let Some(v) = var(PREVIEW_ENV_VAR) {
        if let Ok(parsed) = v.parse::<bool>() {
            settings.preview_enabled = parsed;
        }
    }
}

pub fn save_settings(path: &Path, settings: &ToolSettings) -> anyhow::Result<()> {
    ensure_parent_dir_exists(path)?;
    let raw = toml::to_string_pretty(settings).context("failed to serialize tool settings")?;
    fs::write(path, raw)
        .with_context(|| format!("failed to write settings file '{}'", path.display()))?;
    Ok(())
}

fn ensure_parent_dir_exists(path: &Path) -> anyhow::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };

    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for settings file '{}'",
            parent.display(),
            path.display()
        )
    })?;

    Ok(())
}
