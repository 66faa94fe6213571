//! # Aptos Counter
//!
//! A terminal front-end for the `counter` Move module: connect a wallet,
//! publish a per-account counter, then increment, decrement or reset it.
//!
//! ## Features
//! - Ed25519 key-file wallets, signed submissions through the fullnode REST API
//! - Typed "resource not found" handling (an unpublished counter is not an error)
//! - Single-flight transactions: one in flight per session
//! - Reconnects the last wallet at startup when `auto_connect` is set
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Session Layer (Tokio runtime) - owns the wallet/ledger synchronizer

pub mod constants;
pub mod error;
pub mod models;
pub mod storage;
pub mod ui;
pub mod ledger;
pub mod wallet;
pub mod session;
pub mod messages;
pub mod app;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use error::{LedgerError, WalletError};
pub use models::{Account, AccountAddress, CounterResource, EntryArg, Network, TransactionRequest};
pub use ledger::{Ledger, RestClient};
pub use wallet::{KeyfileWallet, Wallet};
pub use session::{CounterAction, Phase, SessionActor, Synchronizer, ViewState};
pub use messages::{UiEvent, SessionCommand, SessionEvent, RenderState};
pub use app::{AppState, AppActor};
