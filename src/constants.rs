//! Application constants
//!
//! The on-chain module coordinates and the target network are fixed at build
//! time. Everything else a user can change lives in the settings file.

use std::time::Duration;

use crate::models::Network;

/// Address the counter module is published under
pub const MODULE_ADDRESS: &str = "0x42";

/// Name of the Move module holding the counter
pub const MODULE_NAME: &str = "counter";

/// Network the client talks to
pub const NETWORK: Network = Network::Devnet;

/// Name of the counter resource struct inside the module
pub const COUNTER_STRUCT: &str = "Counter";

/// Delay between two polls of a pending transaction
pub const TXN_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Upper bound on waiting for a transaction to leave the mempool
pub const TXN_WAIT_TIMEOUT: Duration = Duration::from_secs(20);

/// Seconds until a submitted transaction expires
pub const TXN_EXPIRATION_SECS: u64 = 30;

/// Gas limit attached to every entry-function call
pub const MAX_GAS_AMOUNT: u64 = 20_000;

/// Timeout for a single REST call
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Directory (under the home directory) holding settings and session files
pub const CONFIG_DIR_NAME: &str = ".aptos-counter";

/// Log file written next to the working directory
pub const LOG_FILE_NAME: &str = "aptos-counter.log";

/// Application name
pub const APP_NAME: &str = "Aptos Counter";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fully qualified type tag of the counter resource
pub fn counter_resource_type() -> String {
    format!("{}::{}::{}", MODULE_ADDRESS, MODULE_NAME, COUNTER_STRUCT)
}

/// Fully qualified identifier of a counter entry function
pub fn entry_function_id(function_name: &str) -> String {
    format!("{}::{}::{}", MODULE_ADDRESS, MODULE_NAME, function_name)
}
