use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("invalid semver: {0}")]
    Parse(String),

    #[error("{0}")]
    Config(String),

    /// First line of the external tool's diagnostic output, unchanged
    #[error("{0}")]
    ExternalTool(String),

    /// Expected absence (no tag yet), never reported to the user
    #[error("not found: {0}")]
    NotFound(String),

    /// The underlying error is exposed as the source, not repeated in the message
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a version parsing error
    pub fn parse(msg: impl Into<String>) -> Self {
        ReleaseError::Parse(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create an external tool error from its diagnostic output.
    ///
    /// Only the first line is kept.
    pub fn external(diagnostic: &str) -> Self {
        let first = diagnostic.lines().next().unwrap_or_default();
        ReleaseError::ExternalTool(first.to_string())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        ReleaseError::NotFound(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ReleaseError::NotFound(_))
    }
}
