// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Completion model port.
//!
//! Anti-corruption layer over external LLM APIs: the pipeline sees one
//! stateless `complete` call, no streaming, no multi-turn memory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Options for a single completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub max_tokens: Option<u32>,

    pub temperature: Option<f32>,

    pub stop_sequences: Option<Vec<String>>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: Some(512),
            temperature: Some(0.5),
            stop_sequences: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Completion {
    /// Generated text.
    pub text: String,

    /// Model that produced it (e.g. "gpt-4o").
    pub model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("rate limit exceeded")]
    RateLimit,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Domain interface for completion providers.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Completion, LlmError>;
}
