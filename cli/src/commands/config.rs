// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use aegis_chat_gateway::domain::GatewayConfig;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets masked)
    Show,

    /// Validate a configuration file
    Validate {
        /// Path to config file (default: --config / environment)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show => show(config_override),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
    }
}

fn show(config_override: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_override)?;

    println!("{}", "Effective configuration:".bold());
    let yaml = serde_yaml::to_string(&config.redacted()).context("failed to render config")?;
    println!("{yaml}");
    Ok(())
}

fn validate(file: Option<PathBuf>) -> Result<()> {
    match super::load_config(file) {
        Ok(config) => {
            println!("{} configuration is valid", "✓".green().bold());
            println!("  platform domain: {}", config.platform.domain);
            println!("  retriever: {}", config.retriever.endpoint);
            println!("  model: {}", config.llm.model);
            Ok(())
        }
        Err(e) => {
            println!("{} {e:#}", "✗".red().bold());
            Err(e)
        }
    }
}
