//! Custom error types for pagemark

use thiserror::Error;

/// Main error type for pagemark operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("A capture session is already active")]
    CaptureActive,

    #[error("GitHub API error ({status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Content decode error: {0}")]
    ContentDecode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Reading not found: {0}")]
    ReadingNotFound(String),

    #[error("Not initialized: run 'pagemark init' first")]
    NotInitialized,

    #[error("Already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl Error {
    /// The contents API reports a missing file as 404; `init` treats that
    /// as "create the file" rather than a failure.
    pub fn is_remote_not_found(&self) -> bool {
        matches!(self, Error::Remote { status: 404, .. })
    }

    /// A stale revision token on PUT comes back as 409.
    pub fn is_remote_conflict(&self) -> bool {
        matches!(self, Error::Remote { status: 409, .. })
    }
}

/// Result type alias for pagemark
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_status_predicates() {
        let not_found = Error::Remote {
            status: 404,
            body: "Not Found".into(),
        };
        assert!(not_found.is_remote_not_found());
        assert!(!not_found.is_remote_conflict());

        let conflict = Error::Remote {
            status: 409,
            body: "is at abc123 but expected def456".into(),
        };
        assert!(conflict.is_remote_conflict());
        assert!(!conflict.is_remote_not_found());
    }
}
