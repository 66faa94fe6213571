//! Error types for the ledger and wallet boundaries

use thiserror::Error;

use crate::models::TransactionHash;

/// Node error codes that mean "nothing stored here"
const NOT_FOUND_CODES: &[&str] = &["resource_not_found", "account_not_found"];

/// Failures of the ledger REST client
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The requested resource or account does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Node returned {status}: {message}")]
    Api {
        status: u16,
        message: String,
        error_code: Option<String>,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Transaction {hash} failed: {vm_status}")]
    TransactionFailed {
        hash: TransactionHash,
        vm_status: String,
    },

    #[error("Timed out waiting for transaction {hash}")]
    Timeout { hash: TransactionHash },
}

impl LedgerError {
    /// Classify a non-success response from the node
    pub fn from_response(status: u16, message: String, error_code: Option<String>) -> Self {
        let not_found = status == 404
            || error_code
                .as_deref()
                .is_some_and(|code| NOT_FOUND_CODES.contains(&code));
        if not_found {
            LedgerError::NotFound { message }
        } else {
            LedgerError::Api {
                status,
                message,
                error_code,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound { .. })
    }
}

/// Failures of the wallet session adapter
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Unknown wallet: {0}")]
    UnknownWallet(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
