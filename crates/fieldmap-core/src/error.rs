//! Error types for the map controller, grouped by layer

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Controller error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Map Data Errors
    // ─────────────────────────────────────────────────────────────
    /// The in-flight fetch was cancelled. Expected on unmount or when a
    /// gating condition drops; never surfaced to the user.
    #[error("Map data fetch aborted")]
    FetchAborted,

    #[error("Map data fetch failed: {message}")]
    FetchFailed { message: String },

    #[error("Invalid recommended center: {reason}")]
    InvalidRecommendedCenter { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Map Surface Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Map surface error: {message}")]
    Surface { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    // ─────────────────────────────────────────────────────────────
    // Replay Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Scenario error at line {line}: {message}")]
    Scenario { line: usize, message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self::FetchFailed {
            message: message.into(),
        }
    }

    pub fn invalid_center(reason: impl Into<String>) -> Self {
        Self::InvalidRecommendedCenter {
            reason: reason.into(),
        }
    }

    pub fn surface(message: impl Into<String>) -> Self {
        Self::Surface {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }

    pub fn scenario(line: usize, message: impl Into<String>) -> Self {
        Self::Scenario {
            line,
            message: message.into(),
        }
    }

    /// True for cancellations, which callers swallow without logging
    pub fn is_aborted(&self) -> bool {
        matches!(self, Error::FetchAborted)
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::FetchAborted
                | Error::FetchFailed { .. }
                | Error::InvalidRecommendedCenter { .. }
                | Error::Surface { .. }
        )
    }

    /// Check if this error should stop the controller
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ConfigInvalid { .. } | Error::Scenario { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
