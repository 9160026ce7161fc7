use thiserror::Error;

/// Failure taxonomy for analysis requests.
///
/// Store-level failures abort the whole request; parameter failures are
/// rejected before any computation. Per-item failures (a single update that
/// cannot be tokenized) are not represented here because they are recovered
/// in place, not surfaced.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The update store could not be read. Retryable.
    #[error("update store unavailable: {reason}")]
    DataUnavailable { reason: String },
    /// A request parameter is outside its documented domain. Not retryable
    /// without correction.
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}

impl AnalysisError {
    pub fn data_unavailable(reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            reason: reason.into(),
        }
    }

    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Stable kind tag for API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DataUnavailable { .. } => "data_unavailable",
            Self::InvalidParameter { .. } => "invalid_parameter",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DataUnavailable { .. })
    }
}
