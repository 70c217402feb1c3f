// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Client-held conversation state.
//!
//! An explicit, serializable state container: the transcript, the guard
//! toggles, and the last-seen audit payloads for display. Replaces ambient
//! shared state; one instance per conversation, owned by the caller. The
//! gateway never sees or stores any of this.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use aegis_chat_gateway::domain::{AuthzDecision, DocumentSummary};
use aegis_chat_gateway::presentation::api::{ChatResponseBody, OutcomeKind};

/// Per-conversation stage toggles, sent with every request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GuardToggles {
    pub authz: bool,
    pub prompt_guard: bool,
    pub content_guard: bool,
}

impl Default for GuardToggles {
    fn default() -> Self {
        Self {
            authz: true,
            prompt_guard: true,
            content_guard: true,
        }
    }
}

/// One rendered line of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptEntry {
    UserPrompt {
        id: Uuid,
        at: DateTime<Utc>,
        text: String,
    },
    GuardFindings {
        id: Uuid,
        at: DateTime<Utc>,
        stage: String,
        findings: Value,
    },
    AssistantReply {
        id: Uuid,
        at: DateTime<Utc>,
        text: String,
    },
    Notice {
        id: Uuid,
        at: DateTime<Utc>,
        text: String,
    },
}

/// The state container. Not server authoritative; purely for display.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatSession {
    entries: Vec<TranscriptEntry>,

    pub toggles: GuardToggles,

    /// Last-seen audit payloads, replaced wholesale on every response.
    pub last_prompt_guard: Option<Value>,
    pub last_input_guard: Option<Value>,
    pub last_output_guard: Option<Value>,
    pub last_authz_decisions: Vec<AuthzDecision>,
    pub last_documents: Vec<DocumentSummary>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_toggles(toggles: GuardToggles) -> Self {
        Self {
            toggles,
            ..Self::default()
        }
    }

    /// Wrap in a shareable handle for concurrent UI access.
    pub fn into_shared(self) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(self))
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn push_user_prompt(&mut self, text: impl Into<String>) {
        self.entries.push(TranscriptEntry::UserPrompt {
            id: Uuid::new_v4(),
            at: Utc::now(),
            text: text.into(),
        });
    }

    pub fn push_notice(&mut self, text: impl Into<String>) {
        self.entries.push(TranscriptEntry::Notice {
            id: Uuid::new_v4(),
            at: Utc::now(),
            text: text.into(),
        });
    }

    /// Fold a pipeline response into the transcript and replace the
    /// last-seen audit payloads.
    pub fn record_response(&mut self, response: &ChatResponseBody) {
        self.last_prompt_guard = response
            .prompt_guard
            .as_ref()
            .map(|v| v.audit.clone());
        self.last_input_guard = response.input_guard.as_ref().map(|v| v.audit.clone());
        self.last_output_guard = response.output_guard.as_ref().map(|v| v.audit.clone());
        self.last_authz_decisions = response.authz_responses.clone();
        self.last_documents = response.documents.clone();

        if let Some(verdict) = &response.input_guard {
            self.entries.push(TranscriptEntry::GuardFindings {
                id: Uuid::new_v4(),
                at: Utc::now(),
                stage: "input".into(),
                findings: verdict.findings.clone(),
            });
        }

        match response.outcome {
            OutcomeKind::Completed => {
                self.entries.push(TranscriptEntry::AssistantReply {
                    id: Uuid::new_v4(),
                    at: Utc::now(),
                    text: response.reply.clone(),
                });
                if let Some(verdict) = &response.output_guard {
                    self.entries.push(TranscriptEntry::GuardFindings {
                        id: Uuid::new_v4(),
                        at: Utc::now(),
                        stage: "output".into(),
                        findings: verdict.findings.clone(),
                    });
                }
            }
            OutcomeKind::Halted => {
                self.entries.push(TranscriptEntry::Notice {
                    id: Uuid::new_v4(),
                    at: Utc::now(),
                    text: response.reply.clone(),
                });
            }
        }
    }
}
