use serde::{Deserialize, Serialize};

/// Failures that abort loading the widget for the current page view.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The request never produced a response.
    #[error("network error reaching {url}: {reason}")]
    Network { url: String, reason: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {status} ({url})")]
    Status { url: String, status: u16 },

    /// The response body was not the JSON shape we expect.
    #[error("malformed response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The container element is not in the document.
    #[error("updates container `{0}` not found")]
    MissingMount(String),
}

impl FeedError {
    pub fn network(url: &str, reason: impl Into<String>) -> Self {
        FeedError::Network {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while reading the widget configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("invalid log level `{0}`")]
    LogLevel(String),
}

/// Payload POSTed to the error-logging endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub message: String,
    pub stack: String,
}

impl ErrorReport {
    /// Flattens an error and its `source()` chain into a report.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut stack = format!("{err:?}");
        let mut cause = err.source();
        while let Some(inner) = cause {
            stack.push_str("\ncaused by: ");
            stack.push_str(&inner.to_string());
            cause = inner.source();
        }

        let message = err.to_string();
        Self {
            message: if message.is_empty() {
                "unknown error".into()
            } else {
                message
            },
            stack,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&FeedError> for ErrorReport {
    fn from(err: &FeedError) -> Self {
        ErrorReport::from_error(err)
    }
}
