//! Layered configuration loading.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. The bare `DATABASE_URL` and `GEMINI_API_KEY` variables
//! 3. `PLANWRIGHT_*` variables, with `__` separating nested sections
//!    (`PLANWRIGHT_AI__MODEL` sets `ai.model`)

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default Generative Language API base URL.
pub const DEFAULT_AI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for subtask drafting.
pub const DEFAULT_AI_MODEL: &str = "gemini-2.5-flash";

/// Default timeout applied to provider calls, in seconds.
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

const ENV_PREFIX: &str = "PLANWRIGHT_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanwrightConfig {
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Text-generation provider settings.
    #[serde(default)]
    pub ai: AiConfig,
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/planwright".to_owned(),
            max_connections: 10,
        }
    }
}

/// Text-generation provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Provider API key. Blank values count as unset.
    pub api_key: Option<String>,
    /// Model name.
    pub model: String,
    /// API base URL.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Returns the API key when one is set and not blank.
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Returns `true` when a usable API key is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.credential().is_some()
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_AI_MODEL.to_owned(),
            endpoint: DEFAULT_AI_ENDPOINT.to_owned(),
            timeout_secs: DEFAULT_AI_TIMEOUT_SECS,
        }
    }
}

impl PlanwrightConfig {
    /// Loads configuration from defaults and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a value cannot be extracted.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::figment().extract()?)
    }

    /// Builds the provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "database.url".into()))
            .merge(Env::raw().only(&["GEMINI_API_KEY"]).map(|_| "ai.api_key".into()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
