//! Error types for Tubescribe.

use thiserror::Error;

/// Library-level error type for Tubescribe operations.
#[derive(Error, Debug)]
pub enum ScribeError {
    /// An outbound HTTP call failed at the transport level or returned a
    /// non-success status. `transient` marks failures worth retrying.
    #[error("Fetch failed: {reason}")]
    Fetch { reason: String, transient: bool },

    #[error("Could not find INNERTUBE_API_KEY: {0}")]
    KeyExtraction(String),

    #[error("No captions available for this video")]
    NoCaptions,

    #[error("Transcript is empty")]
    EmptyTranscript,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YouTube Data API error: {0}")]
    YoutubeApi(String),

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("{0}")]
    Llm(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ScribeError {
    /// Build a fetch error for a request that never produced a response.
    ///
    /// reqwest embeds the full request URL in its message, so it is dropped
    /// in favor of the redacted one.
    pub fn transport(url: &str, err: reqwest::Error) -> Self {
        ScribeError::Fetch {
            reason: format!("{} ({})", err.without_url(), redact(url)),
            transient: true,
        }
    }

    /// Build a fetch error for a non-success HTTP status.
    pub fn status(url: &str, status: reqwest::StatusCode) -> Self {
        ScribeError::Fetch {
            reason: format!("{} returned {}", redact(url), status),
            transient: status == reqwest::StatusCode::TOO_MANY_REQUESTS
                || status.is_server_error(),
        }
    }

    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScribeError::Fetch { transient: true, .. })
    }
}

/// Strip the query string so API keys never end up in error messages.
pub(crate) fn redact(url: &str) -> &str {
    url.split_once('?').map(|(base, _)| base).unwrap_or(url)
}

/// Result type alias for Tubescribe operations.
pub type Result<T> = std::result::Result<T, ScribeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_messages() {
        assert_eq!(
            ScribeError::NoCaptions.to_string(),
            "No captions available for this video"
        );
        assert_eq!(ScribeError::EmptyTranscript.to_string(), "Transcript is empty");
    }

    #[test]
    fn test_status_transience() {
        let url = "https://www.youtube.com/youtubei/v1/player?key=secret";
        let err = ScribeError::status(url, reqwest::StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.is_transient());
        assert!(!err.to_string().contains("secret"));

        let err = ScribeError::status(url, reqwest::StatusCode::NOT_FOUND);
        assert!(!err.is_transient());
        assert!(!ScribeError::NoCaptions.is_transient());
    }
}
