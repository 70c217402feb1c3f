// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Client SDK for the AEGIS chat gateway.
//!
//! Provides the gateway HTTP client, a client-held conversation state
//! container (transcript, toggles, last-seen audit payloads), and the
//! explicitly-saved settings entity. Nothing here is server authoritative;
//! the transcript is cosmetic only.

pub mod client;
pub mod session;
pub mod settings;

pub use client::ChatGatewayClient;
pub use session::{ChatSession, GuardToggles, TranscriptEntry};
pub use settings::ChatSettings;
