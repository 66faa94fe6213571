//! Session messages - communication between App and Session layers

use crate::models::Account;
use crate::session::CounterAction;

/// Commands sent from App layer to Session layer
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Connect the named wallet and load its counter
    Connect { wallet: String },
    Disconnect,
    /// Re-read the counter
    Refresh,
    /// Run a counter transaction; `id` is echoed back when it settles
    Execute { id: u64, action: CounterAction },
    /// Shutdown the session actor
    Shutdown,
}

/// Events sent from Session layer to App layer.
///
/// View changes do not travel here; they are published on the
/// synchronizer's watch channel.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Connected { wallet: String, account: Account },
    ConnectFailed { wallet: String, message: String },
    Disconnected,
    /// The transaction command with this id is done, successfully or not
    TransactionSettled { id: u64 },
}
