// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Run the gateway HTTP server.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use aegis_chat_gateway::presentation::api;

#[derive(Args)]
pub struct ServeArgs {
    /// Listen address (overrides config)
    #[arg(long, env = "AEGIS_CHAT_BIND")]
    bind: Option<String>,
}

pub async fn run(args: ServeArgs, config_override: Option<PathBuf>) -> Result<()> {
    let mut config = super::load_config(config_override)?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    if let Some(metrics_bind) = &config.server.metrics_bind {
        let addr: std::net::SocketAddr = metrics_bind
            .parse()
            .with_context(|| format!("invalid metrics address: {metrics_bind}"))?;
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("failed to start metrics exporter")?;
        info!(%addr, "metrics exporter listening");
    }

    let state = api::state_from_config(&config);
    let app = api::app(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;

    println!(
        "{} listening on {}",
        "aegis-chat gateway".bold(),
        config.server.bind.green()
    );
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
