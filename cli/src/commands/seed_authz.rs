// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Create relationship tuples in the authorization store.
//!
//! Reads a JSON file of `{subject, relation, resource}` tuples (typically
//! exported from the corpus source's own permission listing) and writes them
//! to the authorization service, so the per-document checks issued by the
//! pipeline have relations to evaluate.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use aegis_chat_gateway::domain::RelationTuple;
use aegis_chat_gateway::infrastructure::{RelationCheckClient, ServiceClient};

#[derive(Args)]
pub struct SeedAuthzArgs {
    /// Path to a JSON file containing an array of tuples
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

pub async fn run(args: SeedAuthzArgs, config_override: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_override)?;

    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let tuples: Vec<RelationTuple> =
        serde_json::from_str(&content).context("failed to parse tuples file")?;

    if tuples.is_empty() {
        println!("{}", "no tuples found, nothing to do".yellow());
        return Ok(());
    }

    let client = RelationCheckClient::new(Arc::new(ServiceClient::new(&config.platform)));
    let created = client
        .create_tuples(&tuples)
        .await
        .context("tuple creation failed")?;

    println!("{} created {} tuples", "✓".green().bold(), created);
    Ok(())
}
