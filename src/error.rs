//! Error types shared by the shell, the navigator and the backend client.
use thiserror::Error;

/// Result type alias using `PlayerError`
pub type Result<T> = std::result::Result<T, PlayerError>;

#[derive(Error, Debug)]
pub enum PlayerError {
    /// Transport failure or a non-2xx response
    #[error("Request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("Request to {url} timed out after {millis}ms")]
    Timeout { url: String, millis: u64 },

    /// Malformed backend payload or config document
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// A required DOM attachment point is absent from the host page
    #[error("Missing page element: #{0}")]
    MissingElement(String),

    #[error("Frame message rejected: {0}")]
    MessageProtocol(String),

    #[error("Queue position {position} is out of range for {len} tracks")]
    InvalidQueue { position: usize, len: usize },

    #[error("Audio error: {0}")]
    Audio(String),

    /// A browser API call on an attached element failed
    #[error("DOM error: {0}")]
    Dom(String),
}

impl PlayerError {
    pub fn network(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Network {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::MessageProtocol(msg.into())
    }

    pub fn missing_element(id: impl Into<String>) -> Self {
        Self::MissingElement(id.into())
    }
}

impl From<serde_json::Error> for PlayerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
