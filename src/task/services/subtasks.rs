//! Subtask drafting with a deterministic offline fallback.
//!
//! The generator never fails outward. Any provider problem selects a
//! keyword-driven fallback checklist and is reported through `tracing`.

use crate::config::{AiConfig, DEFAULT_AI_TIMEOUT_SECS};
use crate::task::{
    adapters::gemini::GeminiClient,
    domain::Subtask,
    ports::{ProviderError, TextGenerationProvider},
};
use minijinja::{Environment, context};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

const PROMPT_TEMPLATE: &str = r#"You are an expert event planner.
Break down this task into 3-5 concrete, actionable steps.
Task: "{{ title }}"
Context: "{{ context }}"

Return ONLY raw JSON in this format:
[{"title": "Step 1", "is_done": false}, {"title": "Step 2", "is_done": false}]
"#;

const VENUE_STEPS: [&str; 3] = [
    "Research capacity options",
    "Schedule site visits",
    "Review contract terms",
];
const VENDOR_STEPS: [&str; 3] = [
    "Create application form",
    "Email past vendors",
    "Collect payments",
];
const GENERIC_STEPS: [&str; 3] = [
    "Draft initial plan (AI Offline)",
    "Review with team",
    "Execute",
];

/// Why the offline checklist was used instead of provider output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No provider credential is configured.
    NotConfigured,
    /// The prompt template failed to render.
    PromptRender(String),
    /// The provider call exceeded the timeout.
    TimedOut,
    /// The provider call failed.
    ProviderFailed(String),
    /// The provider returned no candidates.
    NoCandidates,
    /// The first candidate holds no `[`…`]` span.
    NoJsonArray,
    /// The extracted span is not a JSON array of subtasks.
    InvalidJson(String),
    /// The parsed array is empty.
    EmptyPlan,
    /// A parsed subtask has a blank title.
    BlankTitle,
}

impl FallbackReason {
    /// Returns a short machine-readable label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::PromptRender(_) => "prompt_render",
            Self::TimedOut => "timed_out",
            Self::ProviderFailed(_) => "provider_failed",
            Self::NoCandidates => "no_candidates",
            Self::NoJsonArray => "no_json_array",
            Self::InvalidJson(_) => "invalid_json",
            Self::EmptyPlan => "empty_plan",
            Self::BlankTitle => "blank_title",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PromptRender(detail)
            | Self::ProviderFailed(detail)
            | Self::InvalidJson(detail) => write!(f, "{}: {detail}", self.as_str()),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Origin of a generated checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    /// Parsed from provider output.
    Provider,
    /// Keyword fallback.
    Fallback(FallbackReason),
}

/// A drafted checklist and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPlan {
    /// Drafted subtasks; never empty, every item open.
    pub subtasks: Vec<Subtask>,
    /// Origin of `subtasks`.
    pub source: PlanSource,
}

impl GeneratedPlan {
    /// Returns `true` when the fallback checklist was used.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self.source, PlanSource::Fallback(_))
    }
}

/// Drafts subtask checklists through an optional text-generation provider.
#[derive(Clone)]
pub struct SubtaskGenerator {
    provider: Option<Arc<dyn TextGenerationProvider>>,
    timeout: Duration,
}

impl fmt::Debug for SubtaskGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubtaskGenerator")
            .field("online", &self.provider.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for SubtaskGenerator {
    fn default() -> Self {
        Self::offline()
    }
}

impl SubtaskGenerator {
    /// Creates a generator backed by `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn TextGenerationProvider>) -> Self {
        Self {
            provider: Some(provider),
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }

    /// Creates a generator that always uses the fallback checklist.
    #[must_use]
    pub const fn offline() -> Self {
        Self {
            provider: None,
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }

    /// Creates a Gemini-backed generator, or an offline one when no key is
    /// configured or the HTTP client cannot be built.
    #[must_use]
    pub fn from_config(config: &AiConfig) -> Self {
        let generator = match GeminiClient::from_config(config) {
            Ok(Some(client)) => Self::new(Arc::new(client)),
            Ok(None) => Self::offline(),
            Err(err) => {
                tracing::warn!(error = %err, "text-generation client unavailable");
                Self::offline()
            }
        };
        generator.with_timeout(config.timeout())
    }

    /// Overrides the provider call timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns `true` when a provider is attached.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        self.provider.is_some()
    }

    /// Drafts subtasks for a task.
    pub async fn generate(&self, title: &str, context: &str) -> Vec<Subtask> {
        self.generate_plan(title, context).await.subtasks
    }

    /// Drafts subtasks and reports whether the provider or the fallback
    /// produced them.
    pub async fn generate_plan(&self, title: &str, context: &str) -> GeneratedPlan {
        match self.provider_plan(title, context).await {
            Ok(subtasks) => {
                tracing::debug!(steps = subtasks.len(), "drafted subtasks from provider");
                GeneratedPlan {
                    subtasks,
                    source: PlanSource::Provider,
                }
            }
            Err(reason) => {
                tracing::warn!(reason = %reason, "using offline subtask checklist");
                GeneratedPlan {
                    subtasks: fallback_subtasks(title),
                    source: PlanSource::Fallback(reason),
                }
            }
        }
    }

    async fn provider_plan(
        &self,
        title: &str,
        context: &str,
    ) -> Result<Vec<Subtask>, FallbackReason> {
        let Some(provider) = self.provider.as_ref() else {
            return Err(FallbackReason::NotConfigured);
        };
        let prompt = render_prompt(title, context)?;
        let response = tokio::time::timeout(self.timeout, provider.generate(&prompt))
            .await
            .map_err(|_| FallbackReason::TimedOut)?
            .map_err(|err| match err {
                ProviderError::MissingCredential => FallbackReason::NotConfigured,
                other => FallbackReason::ProviderFailed(other.to_string()),
            })?;
        let text = response
            .first_candidate()
            .ok_or(FallbackReason::NoCandidates)?;
        parse_plan(text)
    }
}

fn render_prompt(title: &str, context: &str) -> Result<String, FallbackReason> {
    Environment::new()
        .render_str(PROMPT_TEMPLATE, context! { title => title, context => context })
        .map_err(|err| FallbackReason::PromptRender(err.to_string()))
}

/// Parses the JSON array spanning the first `[` to the last `]` of `text`.
///
/// Every returned subtask is open.
///
/// # Errors
///
/// Returns the [`FallbackReason`] describing why `text` is unusable.
pub fn parse_plan(text: &str) -> Result<Vec<Subtask>, FallbackReason> {
    let span = json_array_span(text).ok_or(FallbackReason::NoJsonArray)?;
    let parsed: Vec<Subtask> =
        serde_json::from_str(span).map_err(|err| FallbackReason::InvalidJson(err.to_string()))?;
    if parsed.is_empty() {
        return Err(FallbackReason::EmptyPlan);
    }
    parsed
        .into_iter()
        .map(|subtask| {
            let title = subtask.title.trim();
            if title.is_empty() {
                Err(FallbackReason::BlankTitle)
            } else {
                Ok(Subtask::open(title))
            }
        })
        .collect()
}

fn json_array_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    text.get(start..=end)
}

/// Returns the keyword-driven offline checklist for `title`.
#[must_use]
pub fn fallback_subtasks(title: &str) -> Vec<Subtask> {
    let lowered = title.to_lowercase();
    let steps = if lowered.contains("venue") {
        VENUE_STEPS
    } else if lowered.contains("vendor") {
        VENDOR_STEPS
    } else {
        GENERIC_STEPS
    };
    steps.into_iter().map(Subtask::open).collect()
}
