// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! The request-scoped query object.
//!
//! Carries the raw prompt plus the caller-supplied stage toggles as one
//! explicit, serializable value. Created from the request body, read by the
//! pipeline, never mutated.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardedQuery {
    pub user_prompt: String,

    /// Run the per-document authorization filter.
    pub enable_authz: bool,

    /// Screen the prompt for injection before anything else runs.
    pub enable_prompt_guard: bool,

    /// Redact sensitive content on the way in and on the way out.
    pub enable_content_guard: bool,
}

impl GuardedQuery {
    /// A query with every guard stage enabled.
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            enable_authz: true,
            enable_prompt_guard: true,
            enable_content_guard: true,
        }
    }

    pub fn authz(mut self, enabled: bool) -> Self {
        self.enable_authz = enabled;
        self
    }

    pub fn prompt_guard(mut self, enabled: bool) -> Self {
        self.enable_prompt_guard = enabled;
        self
    }

    pub fn content_guard(mut self, enabled: bool) -> Self {
        self.enable_content_guard = enabled;
        self
    }
}
