//! Field extraction turns free-text weekly updates into the structured
//! analysis stored alongside each update.
//!
//! Two implementations sit behind [`FieldExtractor`]: [`ChatExtractor`]
//! calls an OpenAI-compatible chat completion API, [`HeuristicExtractor`]
//! is a deterministic offline fallback. Callers pick at the edge; the
//! rest of the system only sees `ExtractedFields`.

pub mod chat;
pub mod heuristic;

use cadence_core::ExtractedFields;

pub use chat::{parse_fields, ChatConfig, ChatExtractor};
pub use heuristic::HeuristicExtractor;

/// Why an extraction attempt produced nothing usable.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Transport failure, timeout, or upstream outage. Retryable; the
    /// chat extractor retries with backoff before surfacing this.
    #[error("extraction service unavailable: {reason}")]
    Unavailable { reason: String },
    /// The upstream answered but the analysis payload was malformed.
    /// Not retryable; the request has to change.
    #[error("extraction service returned a malformed analysis: {reason}")]
    BadResponse { reason: String },
    /// No API key configured for the chat extractor.
    #[error("extraction API key not configured")]
    MissingKey,
}

impl ExtractError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExtractError::Unavailable { .. })
    }
}

/// Pluggable extraction collaborator.
#[async_trait::async_trait]
pub trait FieldExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<ExtractedFields, ExtractError>;
}

/// Read the chat API key the way the deployment provides it.
pub fn api_key_from_env() -> Option<String> {
    std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())
}
