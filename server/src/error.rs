//! Error types shared across the orchestration node

use thiserror::Error;

/// Failures talking to the ledger gateway.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("ledger rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    #[error("ledger response missing field `{0}`")]
    MissingField(&'static str),
}

impl LedgerError {
    pub fn decode(what: &'static str, reason: impl ToString) -> Self {
        Self::Decode {
            what,
            reason: reason.to_string(),
        }
    }
}

/// Startup configuration problems. These are the only fatal errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read network config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid network config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("network `{0}` not present in network config")]
    UnknownNetwork(String),

    #[error("invalid value for {key}: {reason}")]
    InvalidVar { key: &'static str, reason: String },

    #[error("invalid address `{0}`")]
    InvalidAddress(String),

    #[error("ledger exposes {available} accounts but the identity pool needs {required}")]
    NotEnoughAccounts { available: usize, required: usize },
}

/// Errors surfaced by the passenger-facing service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
