//! Error types for transaction preparation

use thiserror::Error;

/// Main error type for the preparation pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TxError {
    #[error("Account {address} does not exist on chain")]
    AccountNotFound { address: String },

    #[error("Query to {path} failed: {message}")]
    RemoteQuery { path: String, message: String },

    #[error("Broadcast failed: {0}")]
    Broadcast(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Build error: {0}")]
    Build(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TxError {
    /// Stable label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            TxError::AccountNotFound { .. } => "account_not_found",
            TxError::RemoteQuery { .. } => "remote_query",
            TxError::Broadcast(_) => "broadcast",
            TxError::Decode(_) => "decode",
            TxError::Signing(_) => "signing",
            TxError::Build(_) => "build",
            TxError::Config(_) => "config",
        }
    }

    /// Check if the error came from the transport rather than local work
    pub fn is_remote(&self) -> bool {
        matches!(self, TxError::RemoteQuery { .. } | TxError::Broadcast(_))
    }
}

impl From<serde_json::Error> for TxError {
    fn from(e: serde_json::Error) -> Self {
        TxError::Decode(e.to_string())
    }
}

/// Result type for preparation operations
pub type TxResult<T> = Result<T, TxError>;
