//! App state - pure data structure with no I/O logic

use crate::messages::RenderState;
use crate::models::AccountAddress;
use crate::session::{CounterAction, Phase, ViewState};

/// A transaction command sent to the session layer and not yet settled
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingTxn {
    pub id: u64,
    pub action: CounterAction,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    // Wallet
    pub wallets: Vec<String>,
    pub connecting: Option<String>,
    pub wallet_name: Option<String>,
    pub account: Option<AccountAddress>,

    // Latest view published by the session
    pub view: ViewState,

    // Single-flight token for transactions
    pub pending_txn: Option<PendingTxn>,
    pub next_command_id: u64,

    // Status line
    pub notice: Option<String>,

    // Popups
    pub show_help: bool,
}

impl AppState {
    pub fn new(wallets: Vec<String>) -> Self {
        AppState {
            wallets,
            connecting: None,
            wallet_name: None,
            account: None,
            view: ViewState::default(),
            pending_txn: None,
            next_command_id: 1,
            notice: None,
            show_help: false,
        }
    }

    /// Generate a unique command ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_command_id;
        self.next_command_id += 1;
        id
    }

    pub fn connected(&self) -> bool {
        self.account.is_some()
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            wallets: self.wallets.clone(),
            connecting: self.connecting.clone(),
            wallet_name: self.wallet_name.clone(),
            account: self.account,
            // A connect in flight reads as loading until the session answers
            phase: if self.connecting.is_some() {
                Phase::Loading
            } else {
                self.view.phase(self.connected())
            },
            view: self.view.clone(),
            pending_action: self.pending_txn.map(|p| p.action),
            notice: self.notice.clone(),
            show_help: self.show_help,
            ..RenderState::default()
        }
    }
}
