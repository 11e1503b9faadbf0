// Error taxonomy - every failure a user action can surface

use thiserror::Error;

/// Client-side error taxonomy. `Validation` is raised before any network
/// call; `Network` is a transport failure; `Rejected` carries the backend's
/// `detail` message verbatim.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("{0}")]
    Validation(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("local state error: {0}")]
    LocalState(String),
}

impl HubError {
    pub fn validation(msg: impl Into<String>) -> Self {
        HubError::Validation(msg.into())
    }

    /// Whether the failure is worth retrying manually (transport-level, as
    /// opposed to a deliberate backend rejection).
    pub fn is_network(&self) -> bool {
        matches!(self, HubError::Network(_))
    }
}
