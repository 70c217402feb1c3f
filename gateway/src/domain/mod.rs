// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain types and ports for the guarded chat pipeline.
//!
//! Every external collaborator (identity verifier, guard services, document
//! source, authorization store, completion model) is represented by a trait
//! here; implementations live in `infrastructure/`.

pub mod authz;
pub mod config;
pub mod document;
pub mod guard;
pub mod identity;
pub mod llm;
pub mod pipeline;
pub mod query;

pub use authz::{
    AuthzAudit, AuthzChecker, AuthzDecision, AuthzError, CheckOutcome, RelationTuple, TupleActor,
};
pub use config::{ConfigError, GatewayConfig};
pub use document::{CandidateDocument, DocumentSource, DocumentSummary, RetrievalError};
pub use guard::{GuardError, PromptScreen, PromptVerdict, RawVerdict, RedactionVerdict, TextGuard};
pub use identity::{AuthnError, CredentialValidator, SessionIdentity, UserProfile};
pub use llm::{Completion, CompletionModel, GenerationOptions, LlmError};
pub use pipeline::{GuardStage, PipelineError, PipelineOutcome, PipelineResult, HALT_MESSAGE};
pub use query::GuardedQuery;
