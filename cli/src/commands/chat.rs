// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Interactive chat session against a running gateway.
//!
//! Maintains a client-held transcript and the guard toggles, and prints the
//! stage provenance (guard verdicts, authorization decisions, surviving
//! documents) that came back with each reply.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::io::{self, BufRead, Write};

use aegis_chat_gateway::presentation::api::{ChatRequestBody, OutcomeKind};
use aegis_chat_sdk::{ChatGatewayClient, ChatSession, ChatSettings};

#[derive(Args)]
pub struct ChatArgs {
    /// Gateway base URL
    #[arg(long, env = "AEGIS_CHAT_GATEWAY_URL", default_value = "http://127.0.0.1:8080")]
    gateway: String,

    /// Bearer token identifying the user
    #[arg(long, env = "AEGIS_CHAT_TOKEN")]
    token: String,

    /// Show full authorization audit records after each reply
    #[arg(long)]
    verbose_audit: bool,
}

pub async fn run(args: ChatArgs) -> Result<()> {
    let settings_path = ChatSettings::default_path();
    let settings = ChatSettings::load(&settings_path).unwrap_or_default();

    let client = ChatGatewayClient::new(&args.gateway, &args.token);
    let mut session = ChatSession::with_toggles(settings.toggles);

    println!("{}", "aegis-chat interactive session".bold());
    println!("Commands: /authz on|off, /prompt-guard on|off, /content-guard on|off, /save, /quit");
    println!();

    let stdin = io::stdin();
    loop {
        print!("{} ", ">".green());
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("stdin closed")? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('/') {
            if handle_command(rest, &mut session, &settings_path)? {
                break;
            }
            continue;
        }

        session.push_user_prompt(line);

        let request = ChatRequestBody {
            authz: session.toggles.authz,
            user_prompt: line.to_string(),
            prompt_guard: session.toggles.prompt_guard,
            content_guard: session.toggles.content_guard,
        };

        match client.send_chat(&request).await {
            Ok(response) => {
                session.record_response(&response);
                print_response(&response, args.verbose_audit);
            }
            Err(e) => {
                session.push_notice(e.to_string());
                eprintln!("{} {}", "error:".red().bold(), e);
            }
        }
    }

    Ok(())
}

/// Returns `true` when the session should end.
fn handle_command(
    command: &str,
    session: &mut ChatSession,
    settings_path: &std::path::PathBuf,
) -> Result<bool> {
    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("quit"), _) | (Some("exit"), _) => return Ok(true),
        (Some("authz"), Some(value)) => {
            session.toggles.authz = value == "on";
            println!("authorization filtering: {}", on_off(session.toggles.authz));
        }
        (Some("prompt-guard"), Some(value)) => {
            session.toggles.prompt_guard = value == "on";
            println!("prompt screening: {}", on_off(session.toggles.prompt_guard));
        }
        (Some("content-guard"), Some(value)) => {
            session.toggles.content_guard = value == "on";
            println!("content redaction: {}", on_off(session.toggles.content_guard));
        }
        (Some("save"), _) => {
            let settings = ChatSettings {
                toggles: session.toggles,
                ..ChatSettings::default()
            };
            settings.save(settings_path)?;
            println!("settings saved to {}", settings_path.display());
        }
        _ => println!("unknown command: /{command}"),
    }
    Ok(false)
}

fn on_off(value: bool) -> colored::ColoredString {
    if value {
        "on".green()
    } else {
        "off".yellow()
    }
}

fn print_response(
    response: &aegis_chat_gateway::presentation::api::ChatResponseBody,
    verbose_audit: bool,
) {
    match response.outcome {
        OutcomeKind::Halted => {
            println!("{} {}", "halted:".yellow().bold(), response.reply);
        }
        OutcomeKind::Completed => {
            println!("{}", response.reply);
        }
    }

    if let Some(verdict) = &response.prompt_guard {
        println!(
            "  {} detected={}",
            "prompt-guard".dimmed(),
            verdict.detected
        );
    }
    if let Some(verdict) = &response.input_guard {
        println!("  {} findings={}", "input-guard".dimmed(), verdict.findings);
    }
    if let Some(verdict) = &response.output_guard {
        println!("  {} findings={}", "output-guard".dimmed(), verdict.findings);
    }
    if !response.authz_responses.is_empty() {
        let allowed = response.authz_responses.iter().filter(|d| d.allowed).count();
        println!(
            "  {} {}/{} documents allowed",
            "authz".dimmed(),
            allowed,
            response.authz_responses.len()
        );
        if verbose_audit {
            for decision in &response.authz_responses {
                println!(
                    "    {} allowed={} request_id={}",
                    decision.document_id,
                    decision.allowed,
                    decision.audit.request_id.as_deref().unwrap_or("-")
                );
            }
        }
    }
    println!();
}
