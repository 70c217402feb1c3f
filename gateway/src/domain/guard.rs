// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Guard service ports: prompt screening and content redaction.
//!
//! A guard adapter failing is a distinct, stage-tagged error surfaced to the
//! caller; the pipeline never falls back to unguarded behavior.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Verdict of the prompt-injection screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptVerdict {
    /// `true` means the prompt was classified malicious and the pipeline
    /// must not proceed to generation.
    pub detected: bool,

    /// Full service response, passed through for display.
    pub audit: Value,
}

/// Verdict of a redaction pass over some text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionVerdict {
    /// Findings reported by the service; shape is service-defined.
    pub findings: Value,

    /// The input with sensitive spans redacted. Equal to the input when
    /// nothing was found.
    pub redacted_text: String,

    /// Full service response, passed through for display.
    pub audit: Value,
}

/// Raw, unnormalized verdict used by the screening passthrough endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVerdict {
    pub success: bool,
    pub body: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("guard service unreachable: {0}")]
    Network(String),

    #[error("guard service error: {0}")]
    Service(String),

    #[error("malformed guard response: {0}")]
    Malformed(String),
}

/// Port for the prompt-injection screening collaborator.
#[async_trait]
pub trait PromptScreen: Send + Sync {
    async fn screen(&self, prompt: &str) -> Result<PromptVerdict, GuardError>;

    /// Forward a caller-supplied request body verbatim and return the
    /// service's structured verdict. Used by the screening passthrough
    /// endpoint only.
    async fn screen_raw(&self, body: &Value) -> Result<RawVerdict, GuardError>;
}

/// Port for a redaction collaborator. The pipeline holds two instances, one
/// configured for user input and one for model output.
#[async_trait]
pub trait TextGuard: Send + Sync {
    async fn redact(&self, text: &str) -> Result<RedactionVerdict, GuardError>;
}
