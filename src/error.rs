//! Errors surfaced by the state controller

/// Error type for state mutations and persistence
#[derive(Debug, thiserror::Error)]
pub enum LumenError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("A chat reply is still streaming")]
    ChatBusy,

    #[error("App is locked")]
    Locked,

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LumenError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type Result<T, E = LumenError> = std::result::Result<T, E>;
