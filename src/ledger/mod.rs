//! Ledger layer - reads resources from and confirms transactions on a fullnode

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::LedgerError;
use crate::models::{AccountAddress, TransactionHash};

pub use client::RestClient;
pub use types::CommittedTransaction;

/// The two ledger calls the synchronizer depends on
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Fetch the `data` of a resource stored under `address`.
    ///
    /// An absent resource (or absent account) is `LedgerError::NotFound`.
    async fn get_account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<serde_json::Value, LedgerError>;

    /// Block until the transaction is committed, failing if it aborted
    async fn wait_for_transaction(&self, hash: &TransactionHash) -> Result<CommittedTransaction, LedgerError>;
}
