//! Control service client error types.

/// The failure half of every repository result.
///
/// Carries a single user-visible message. Neither variant is retried; the
/// caller surfaces the message and leaves the draft untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// The service answered with a non-success status.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The service could not be reached, or its response could not be read.
    #[error("{message}")]
    Transport { message: String },
}

impl RepositoryError {
    pub fn request(status: u16, message: impl Into<String>) -> Self {
        Self::Request {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// The message to show the user.
    pub fn message(&self) -> &str {
        match self {
            Self::Request { message, .. } | Self::Transport { message } => message,
        }
    }

    /// HTTP status, for request errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Errors building a client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}
