// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Terminal artifacts of one orchestration run.
//!
//! Outcomes are modelled as distinct kinds rather than overloaded exception
//! paths: a screening halt is the pipeline working correctly, not an error.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::authz::AuthzDecision;
use crate::domain::document::{DocumentSummary, RetrievalError};
use crate::domain::guard::{GuardError, PromptVerdict, RedactionVerdict};
use crate::domain::llm::LlmError;

/// Fixed user-visible message for a screening halt.
pub const HALT_MESSAGE: &str = "Processing halted: suspicious prompt";

/// Everything one completed run hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub reply: String,

    /// Verdicts of the guard stages that actually ran. A skipped stage
    /// produces no artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_guard: Option<PromptVerdict>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_guard: Option<RedactionVerdict>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_guard: Option<RedactionVerdict>,

    /// One decision per candidate document, in candidate order. Empty when
    /// authorization was disabled.
    pub authz_decisions: Vec<AuthzDecision>,

    /// The surviving documents, candidate order preserved, content trimmed
    /// for transport.
    pub documents: Vec<DocumentSummary>,
}

/// Terminal state of one run.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Completed(PipelineResult),

    /// Deliberate early termination: the input was classified unsafe, or
    /// redaction left nothing to ask. Not an error.
    Halted {
        message: String,
        prompt_guard: Option<PromptVerdict>,
        input_guard: Option<RedactionVerdict>,
    },
}

/// Pipeline stage a guard error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardStage {
    PromptScreen,
    InputRedact,
    OutputRedact,
}

impl fmt::Display for GuardStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardStage::PromptScreen => write!(f, "prompt screen"),
            GuardStage::InputRedact => write!(f, "input redaction"),
            GuardStage::OutputRedact => write!(f, "output redaction"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Authentication failed; no downstream call was issued.
    #[error("forbidden")]
    Forbidden,

    /// A guard adapter failed at the given stage. The request is abandoned;
    /// this includes output redaction, which never degrades to forwarding
    /// an unredacted reply.
    #[error("{stage} guard call failed: {source}")]
    Guard {
        stage: GuardStage,
        source: GuardError,
    },

    #[error("document retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("completion failed: {0}")]
    Generation(#[from] LlmError),
}

impl PipelineError {
    /// Stage-specific message shown to the caller.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Forbidden => "Forbidden".to_string(),
            PipelineError::Guard { stage, .. } => format!("{stage} guard call failed"),
            PipelineError::Retrieval(_) => "document retrieval failed".to_string(),
            PipelineError::Generation(_) => "completion failed".to_string(),
        }
    }
}
