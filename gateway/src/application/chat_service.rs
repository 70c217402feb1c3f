// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! The guarded-query orchestration pipeline.
//!
//! One stateless execution per request, sequencing:
//!
//! ```text
//! authenticate → prompt screen → input redact → retrieve
//!     → authorize → generate → output redact → respond
//! ```
//!
//! Optional stages are skipped by the query's toggles (skip means
//! pass-through, no audit artifact). A screening hit is a deliberate halt,
//! not an error. All suspension points are the outbound adapter calls; the
//! only fan-out is the per-document authorization check inside
//! [`AuthzFilter`].

use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::authz_filter::AuthzFilter;
use crate::application::generation::AnswerGenerator;
use crate::domain::document::{DocumentSource, DocumentSummary};
use crate::domain::guard::{PromptScreen, TextGuard};
use crate::domain::identity::CredentialValidator;
use crate::domain::pipeline::{
    GuardStage, PipelineError, PipelineOutcome, PipelineResult, HALT_MESSAGE,
};
use crate::domain::query::GuardedQuery;

/// Port consumed by the presentation layer.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn run(
        &self,
        bearer_token: &str,
        query: GuardedQuery,
    ) -> Result<PipelineOutcome, PipelineError>;
}

pub struct GuardedChatService {
    validator: Arc<dyn CredentialValidator>,
    prompt_screen: Arc<dyn PromptScreen>,
    input_guard: Arc<dyn TextGuard>,
    output_guard: Arc<dyn TextGuard>,
    source: Arc<dyn DocumentSource>,
    authz: AuthzFilter,
    generator: AnswerGenerator,
}

impl GuardedChatService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        validator: Arc<dyn CredentialValidator>,
        prompt_screen: Arc<dyn PromptScreen>,
        input_guard: Arc<dyn TextGuard>,
        output_guard: Arc<dyn TextGuard>,
        source: Arc<dyn DocumentSource>,
        authz: AuthzFilter,
        generator: AnswerGenerator,
    ) -> Self {
        Self {
            validator,
            prompt_screen,
            input_guard,
            output_guard,
            source,
            authz,
            generator,
        }
    }
}

#[async_trait]
impl ChatService for GuardedChatService {
    async fn run(
        &self,
        bearer_token: &str,
        query: GuardedQuery,
    ) -> Result<PipelineOutcome, PipelineError> {
        let run_id = Uuid::new_v4();

        // Authenticate. Mandatory; failure issues zero downstream calls.
        let identity = match self.validator.validate(bearer_token).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!(%run_id, error = %e, "authentication failed");
                counter!("aegis_chat_pipeline_total", "outcome" => "forbidden").increment(1);
                return Err(PipelineError::Forbidden);
            }
        };
        info!(%run_id, subject = %identity.subject_id, "pipeline started");

        // Prompt screen.
        let prompt_verdict = if query.enable_prompt_guard {
            let verdict = self
                .prompt_screen
                .screen(&query.user_prompt)
                .await
                .map_err(|source| PipelineError::Guard {
                    stage: GuardStage::PromptScreen,
                    source,
                })?;
            if verdict.detected {
                info!(%run_id, "prompt screen detected malicious input, halting");
                counter!("aegis_chat_pipeline_total", "outcome" => "halted").increment(1);
                return Ok(PipelineOutcome::Halted {
                    message: HALT_MESSAGE.to_string(),
                    prompt_guard: Some(verdict),
                    input_guard: None,
                });
            }
            Some(verdict)
        } else {
            None
        };

        // Input redact. The redacted question feeds every later stage.
        let mut question = query.user_prompt.clone();
        let input_verdict = if query.enable_content_guard {
            let verdict = self
                .input_guard
                .redact(&question)
                .await
                .map_err(|source| PipelineError::Guard {
                    stage: GuardStage::InputRedact,
                    source,
                })?;
            question = verdict.redacted_text.clone();
            if question.trim().is_empty() {
                info!(%run_id, "redaction left an empty question, halting");
                counter!("aegis_chat_pipeline_total", "outcome" => "halted").increment(1);
                return Ok(PipelineOutcome::Halted {
                    message: HALT_MESSAGE.to_string(),
                    prompt_guard: prompt_verdict,
                    input_guard: Some(verdict),
                });
            }
            Some(verdict)
        } else {
            None
        };

        // Retrieve. Mandatory; failure is fatal for this request.
        let candidates = self.source.retrieve(&question).await?;
        info!(%run_id, candidates = candidates.len(), "retrieved candidate documents");

        // Authorize. Bypassed entirely when disabled: all candidates
        // survive and the decision list is empty.
        let (surviving, decisions) = if query.enable_authz {
            self.authz.filter(&identity.subject_id, candidates).await
        } else {
            (candidates, Vec::new())
        };
        info!(%run_id, surviving = surviving.len(), decisions = decisions.len(), "authorization filter done");

        // Generate.
        let reply = self
            .generator
            .generate(&identity.profile, &question, &surviving)
            .await?;

        // Output redact. Failure fails the request; the unredacted reply is
        // never forwarded.
        let (reply, output_verdict) = if query.enable_content_guard {
            let verdict = self
                .output_guard
                .redact(&reply)
                .await
                .map_err(|source| PipelineError::Guard {
                    stage: GuardStage::OutputRedact,
                    source,
                })?;
            (verdict.redacted_text.clone(), Some(verdict))
        } else {
            (reply, None)
        };

        counter!("aegis_chat_pipeline_total", "outcome" => "completed").increment(1);
        Ok(PipelineOutcome::Completed(PipelineResult {
            reply,
            prompt_guard: prompt_verdict,
            input_guard: input_verdict,
            output_guard: output_verdict,
            authz_decisions: decisions,
            documents: surviving.iter().map(DocumentSummary::from).collect(),
        }))
    }
}
