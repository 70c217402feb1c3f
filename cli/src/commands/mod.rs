// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the AEGIS chat CLI

pub mod chat;
pub mod config;
pub mod seed_authz;
pub mod serve;

pub use self::chat::ChatArgs;
pub use self::config::ConfigCommand;
pub use self::seed_authz::SeedAuthzArgs;
pub use self::serve::ServeArgs;

use aegis_chat_gateway::domain::GatewayConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Load configuration from the override file when given, else from the
/// environment.
pub fn load_config(config_override: Option<PathBuf>) -> Result<GatewayConfig> {
    match config_override {
        Some(path) => GatewayConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => GatewayConfig::from_env().context("failed to load config from environment"),
    }
}
