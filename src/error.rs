//! Error types shared across the analysis pipeline

use thiserror::Error;

/// Result type for orchestrator operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// User-facing failures. Raised before (or instead of) provider work when the
/// input itself cannot be analyzed.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("Keyword must not be empty")]
    EmptyKeyword,

    #[error("Video {0} could not be found")]
    VideoNotFound(String),
}

/// Failures reported by an external data provider.
///
/// These never reach the end user directly: the orchestrator replaces the
/// missing data with a documented default and logs the reason.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0} provider is disabled (missing credentials)")]
    Disabled(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Malformed(err.to_string())
    }
}

/// Tagged outcome of a single provider call.
#[derive(Debug)]
pub enum ProviderOutcome<T> {
    Found(T),
    NotFound,
    Failed(ProviderError),
}

impl<T> ProviderOutcome<T> {
    /// Convert into an `Option`, dropping the failure reason
    pub fn found(self) -> Option<T> {
        match self {
            ProviderOutcome::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ProviderOutcome::Found(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ProviderOutcome<U> {
        match self {
            ProviderOutcome::Found(value) => ProviderOutcome::Found(f(value)),
            ProviderOutcome::NotFound => ProviderOutcome::NotFound,
            ProviderOutcome::Failed(err) => ProviderOutcome::Failed(err),
        }
    }

    /// Return the found value or `default`, logging why the default was used
    pub fn or_default_logged(self, what: &str, default: T) -> T {
        match self {
            ProviderOutcome::Found(value) => value,
            ProviderOutcome::NotFound => {
                tracing::debug!("{} not found, using default", what);
                default
            }
            ProviderOutcome::Failed(err) => {
                tracing::warn!("⚠️ {} unavailable ({}), using default", what, err);
                default
            }
        }
    }
}

impl<T> From<std::result::Result<T, ProviderError>> for ProviderOutcome<T> {
    fn from(result: std::result::Result<T, ProviderError>) -> Self {
        match result {
            Ok(value) => ProviderOutcome::Found(value),
            Err(err) => ProviderOutcome::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_found_and_default() {
        let found: ProviderOutcome<u32> = ProviderOutcome::Found(7);
        assert!(found.is_found());
        assert_eq!(found.found(), Some(7));

        let failed: ProviderOutcome<u32> =
            ProviderOutcome::Failed(ProviderError::Disabled("YouTube"));
        assert_eq!(failed.or_default_logged("video count", 0), 0);

        let missing: ProviderOutcome<u32> = ProviderOutcome::NotFound;
        assert_eq!(missing.map(|v| v * 2).found(), None);
    }

    #[test]
    fn test_error_messages() {
        let err = ProviderError::Status {
            provider: "Naver",
            status: 400,
            body: "bad request".to_string(),
        };
        assert_eq!(err.to_string(), "Naver API error 400: bad request");
        assert_eq!(
            AnalysisError::InvalidUrl("foo".to_string()).to_string(),
            "Invalid YouTube URL: foo"
        );
    }
}
