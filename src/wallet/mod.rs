//! Wallet session layer - identity, key custody and signing
//!
//! The synchronizer only sees the `Wallet` trait. `KeyfileWallet` is the
//! adapter shipped with the binary: it signs with Ed25519 keys read from disk.

pub mod keyfile;

use async_trait::async_trait;

use crate::error::WalletError;
use crate::models::{Account, TransactionHash, TransactionRequest};

pub use keyfile::KeyfileWallet;

#[async_trait]
pub trait Wallet: Send + Sync {
    /// Names of the wallets that can be connected
    fn wallets(&self) -> Vec<String>;

    async fn connect(&mut self, name: &str) -> Result<Account, WalletError>;

    async fn disconnect(&mut self) -> Result<(), WalletError>;

    /// The connected account, if any
    fn account(&self) -> Option<&Account>;

    fn connected(&self) -> bool {
        self.account().is_some()
    }

    /// Sign the request with the connected account and submit it.
    ///
    /// Returns as soon as the node accepted the transaction; commitment is
    /// confirmed separately through the ledger.
    async fn sign_and_submit_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionHash, WalletError>;
}
