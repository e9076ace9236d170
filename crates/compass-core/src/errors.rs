//! Error taxonomy for the Compass client.
//!
//! Every failure surfaced by the session manager or a normalizer is a
//! [`CompassError`]. Callers that need to branch on the failure class use
//! [`CompassError::kind`] instead of matching on message text.

use std::fmt;

use thiserror::Error;

/// Convenience alias used across the Compass crates.
pub type Result<T> = std::result::Result<T, CompassError>;

/// Structured classification of a [`CompassError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad base URL or other construction input.
    Configuration,
    /// Credentials rejected, or no session cookie after login.
    Authentication,
    /// The user identifier could not be derived from the session.
    Session,
    /// Operation invoked in the wrong session state.
    Precondition,
    /// Envelope missing its payload, payload mis-shaped, or failure flag set.
    Upstream,
    /// HTTP transport failure, non-success status, or undecodable body.
    Transport,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Authentication => "authentication",
            Self::Session => "session",
            Self::Precondition => "precondition",
            Self::Upstream => "upstream",
            Self::Transport => "transport",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CompassError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("session error: {0}")]
    Session(String),

    #[error("precondition failed: {0}")]
    Precondition(String),

    /// The portal answered, but not with the envelope the operation expects.
    #[error("upstream error in {operation}: {reason}")]
    Upstream {
        /// Remote operation name (e.g. `GetAllLocations`).
        operation: String,
        reason: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The portal returned a non-success status code.
    #[error("portal returned {status} for {path}: {message}")]
    Status {
        status: u16,
        path: String,
        message: String,
    },

    #[error("invalid JSON from portal: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CompassError {
    /// The structured kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Session(_) => ErrorKind::Session,
            Self::Precondition(_) => ErrorKind::Precondition,
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::Http(_) | Self::Status { .. } | Self::Decode(_) => ErrorKind::Transport,
        }
    }

    pub fn upstream(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Upstream {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_from_variants() {
        assert_eq!(
            CompassError::Configuration("empty".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            CompassError::Precondition("not logged in".into()).kind(),
            ErrorKind::Precondition
        );
        assert_eq!(
            CompassError::upstream("GetAllTerms", "missing d").kind(),
            ErrorKind::Upstream
        );
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(CompassError::from(decode).kind(), ErrorKind::Transport);
    }

    #[test]
    fn upstream_message_names_operation() {
        let err = CompassError::upstream("GetAllStaff", "envelope has no `d` field");
        assert_eq!(
            err.to_string(),
            "upstream error in GetAllStaff: envelope has no `d` field"
        );
    }

    #[test]
    fn kind_display_is_lowercase() {
        assert_eq!(ErrorKind::Authentication.to_string(), "authentication");
    }
}
