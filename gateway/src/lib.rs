// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! AEGIS Chat Gateway
//!
//! Guarded retrieval-augmented chat: one stateless orchestration pipeline per
//! request, sequencing authentication, prompt screening, content redaction,
//! document retrieval, per-document authorization filtering, and generation,
//! with full provenance of every guard and authorization decision.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Library crate backing the `aegis-chat` binary

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
