// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Gateway configuration.
//!
//! Loadable from a YAML manifest or straight from the environment. Secret
//! fields support `env:VAR_NAME` indirection so manifests can be committed
//! without credentials.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnv(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Connection settings for the guard platform (identity, guards,
/// authorization all live under one service domain).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Service domain; endpoint URLs are `https://{service}.{domain}/...`.
    pub domain: String,

    /// Token for server-side service calls.
    pub service_token: String,

    /// Token for client-facing calls (token verification).
    pub client_token: String,

    /// Overrides the per-service URL scheme with one fixed base URL.
    /// Intended for local development and tests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url_override: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Base URL of the document retrieval worker.
    pub endpoint: String,

    /// Source folder identifier forwarded to the worker, if it partitions
    /// its corpus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,

    /// When set, the worker ranks by similarity to the query hint and
    /// returns at most this many documents. When unset the full corpus is
    /// returned and the hint is ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible chat-completions base URL.
    pub endpoint: String,

    pub api_key: String,

    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    512
}

fn default_temperature() -> f32 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Prometheus exporter listen address; disabled when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_bind: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            metrics_bind: None,
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub platform: PlatformConfig,

    pub retriever: RetrieverConfig,

    pub llm: LlmConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl GatewayConfig {
    /// Load a YAML manifest and resolve `env:`-indirected secrets.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yaml::from_str(&raw)?;
        config.platform.service_token = resolve_secret(&config.platform.service_token)?;
        config.platform.client_token = resolve_secret(&config.platform.client_token)?;
        config.llm.api_key = resolve_secret(&config.llm.api_key)?;
        Ok(config)
    }

    /// Build the whole configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            platform: PlatformConfig {
                domain: require_env("AEGIS_CHAT_SERVICE_DOMAIN")?,
                service_token: require_env("AEGIS_CHAT_SERVICE_TOKEN")?,
                client_token: require_env("AEGIS_CHAT_CLIENT_TOKEN")?,
                base_url_override: optional_env("AEGIS_CHAT_SERVICE_BASE_URL"),
            },
            retriever: RetrieverConfig {
                endpoint: require_env("AEGIS_CHAT_RETRIEVER_ENDPOINT")?,
                folder_id: optional_env("AEGIS_CHAT_SOURCE_FOLDER_ID"),
                top_k: optional_env("AEGIS_CHAT_RETRIEVER_TOP_K")
                    .and_then(|v| v.parse().ok()),
            },
            llm: LlmConfig {
                endpoint: optional_env("AEGIS_CHAT_LLM_ENDPOINT")
                    .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
                api_key: require_env("AEGIS_CHAT_LLM_API_KEY")?,
                model: optional_env("AEGIS_CHAT_LLM_MODEL")
                    .unwrap_or_else(|| "gpt-4o".to_string()),
                max_tokens: optional_env("AEGIS_CHAT_LLM_MAX_TOKENS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_max_tokens),
                temperature: optional_env("AEGIS_CHAT_LLM_TEMPERATURE")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_temperature),
            },
            server: ServerConfig {
                bind: optional_env("AEGIS_CHAT_BIND").unwrap_or_else(default_bind),
                metrics_bind: optional_env("AEGIS_CHAT_METRICS_BIND"),
            },
        })
    }

    /// Copy with secret fields masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.platform.service_token = mask(&copy.platform.service_token);
        copy.platform.client_token = mask(&copy.platform.client_token);
        copy.llm.api_key = mask(&copy.llm.api_key);
        copy
    }
}

/// Resolve `env:VAR_NAME` indirection; literal values pass through.
fn resolve_secret(value: &str) -> Result<String, ConfigError> {
    match value.strip_prefix("env:") {
        Some(var) => std::env::var(var).map_err(|_| ConfigError::MissingEnv(var.to_string())),
        None => Ok(value.to_string()),
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnv(name.to_string()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        format!("{}…", &secret.chars().take(4).collect::<String>())
    }
}
