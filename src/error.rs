//! Error types for eject

use std::time::Duration;

use thiserror::Error;

/// Result type for eject operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for eject
#[derive(Debug, Error)]
pub enum Error {
    /// Detected OS has no escape handler
    #[error("no escape handler for OS '{0}'")]
    UnsupportedOs(String),

    /// Relay transport error (HTTP exchange failed or body was not JSON)
    #[error("relay transport error: {context}")]
    Transport {
        context: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Relay answered, but not with a usable success envelope
    #[error("relay rejected request (code {code:?}): {body}")]
    Protocol { code: Option<i64>, body: String },

    /// The navigator refused the hand-off outright
    #[error("navigation error: {0}")]
    Navigation(String),

    /// No navigation away from the context was observed in time
    #[error("no navigation observed within {0:?}")]
    Timeout(Duration),
}

impl Error {
    /// Create a transport error with context
    pub fn transport(context: impl Into<String>) -> Self {
        Self::Transport {
            context: context.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping an HTTP source
    pub fn transport_source(context: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            context: context.into(),
            source: Some(source),
        }
    }

    /// Create a protocol error from a parsed relay response
    pub fn protocol(code: Option<i64>, body: impl Into<String>) -> Self {
        Self::Protocol {
            code,
            body: body.into(),
        }
    }

    /// Check if this error came from the relay exchange (either layer)
    pub fn is_relay(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::Protocol { .. })
    }

    /// Check if this is the navigation-never-happened timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}
