// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # AEGIS Chat CLI
//!
//! The `aegis-chat` binary runs the guarded chat gateway and talks to it.
//!
//! ## Commands
//!
//! - `aegis-chat serve` - Run the gateway HTTP server
//! - `aegis-chat chat` - Interactive chat session against a running gateway
//! - `aegis-chat config show|validate` - Configuration management
//! - `aegis-chat seed-authz` - Create relationship tuples for the corpus

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{ChatArgs, ConfigCommand, SeedAuthzArgs, ServeArgs};

/// AEGIS Chat - guarded retrieval-augmented chat gateway
#[derive(Parser)]
#[command(name = "aegis-chat")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides environment)
    #[arg(
        short,
        long,
        global = true,
        env = "AEGIS_CHAT_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the gateway HTTP server
    Serve(ServeArgs),

    /// Start an interactive chat session
    Chat(ChatArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Create relationship tuples in the authorization store
    SeedAuthz(SeedAuthzArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => commands::serve::run(args, cli.config).await,
        Command::Chat(args) => commands::chat::run(args).await,
        Command::Config(command) => commands::config::handle_command(command, cli.config).await,
        Command::SeedAuthz(args) => commands::seed_authz::run(args, cli.config).await,
    }
}
