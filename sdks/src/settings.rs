// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Persisted chat preferences.
//!
//! A separate, explicitly-saved settings entity: nothing is written unless
//! the caller asks for it. Stored as JSON under the user's config directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::session::GuardToggles;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(default)]
    pub toggles: GuardToggles,

    /// Draft prompt preserved across sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_prompt: Option<String>,

    /// Gateway base URL last used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_url: Option<String>,
}

impl ChatSettings {
    /// Default on-disk location (`~/.config/aegis-chat/settings.json`).
    pub fn default_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("aegis-chat").join("settings.json")
    }

    pub fn load(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings: {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse settings")
    }

    pub fn save(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("failed to create settings directory")?;
        }
        let content = serde_json::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(path, content)
            .with_context(|| format!("failed to write settings: {}", path.display()))?;
        Ok(())
    }
}
