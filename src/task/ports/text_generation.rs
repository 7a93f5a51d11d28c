//! Port for external text-generation providers used to draft subtasks.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Candidate texts returned by a provider for one prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderResponse {
    candidates: Vec<String>,
}

impl ProviderResponse {
    /// Creates a response from candidate texts, in provider order.
    #[must_use]
    pub fn new(candidates: impl IntoIterator<Item = String>) -> Self {
        Self {
            candidates: candidates.into_iter().collect(),
        }
    }

    /// Returns the candidate texts.
    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Returns the first candidate text, if any.
    #[must_use]
    pub fn first_candidate(&self) -> Option<&str> {
        self.candidates.first().map(String::as_str)
    }
}

/// External text-generation contract.
#[async_trait]
pub trait TextGenerationProvider: Send + Sync {
    /// Sends a single text prompt and returns the provider's candidates.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the call fails or the response body
    /// cannot be decoded.
    async fn generate(&self, prompt: &str) -> ProviderResult<ProviderResponse>;
}

/// Errors raised at the provider boundary.
///
/// These never reach callers of the subtask generator; they select the
/// offline fallback instead.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// No credential is configured for the provider.
    #[error("provider credential is not configured")]
    MissingCredential,

    /// Transport-level failure.
    #[error("provider transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
