//! Command handlers - business logic for processing UI and session events

use crate::app::state::PendingTxn;
use crate::app::AppState;
use crate::messages::{SessionCommand, SessionEvent};
use crate::session::{CounterAction, ViewState};

impl AppState {
    // ========================
    // Wallet
    // ========================

    pub fn connect_wallet(&mut self, index: usize) -> Option<SessionCommand> {
        if self.connected() || self.connecting.is_some() {
            return None;
        }
        let Some(name) = self.wallets.get(index).cloned() else {
            if self.wallets.is_empty() {
                self.notice = Some(String::from("No wallets configured"));
            }
            return None;
        };
        self.connect_wallet_by_name(name)
    }

    pub fn connect_wallet_by_name(&mut self, name: String) -> Option<SessionCommand> {
        if self.connected() || self.connecting.is_some() {
            return None;
        }
        self.notice = Some(format!("Connecting {}...", name));
        self.connecting = Some(name.clone());
        Some(SessionCommand::Connect { wallet: name })
    }

    pub fn disconnect(&mut self) -> Option<SessionCommand> {
        if !self.connected() {
            return None;
        }
        // Count is cleared right away; the session confirms with a fresh view
        self.account = None;
        self.wallet_name = None;
        self.view = ViewState::default();
        self.notice = None;
        Some(SessionCommand::Disconnect)
    }

    // ========================
    // Counter
    // ========================

    /// Build a transaction command unless one is already in flight or the
    /// action is unavailable in the current view
    pub fn prepare_action(&mut self, action: CounterAction) -> Option<SessionCommand> {
        if !self.connected() {
            return None;
        }
        if self.pending_txn.is_some() {
            self.notice = Some(String::from("Waiting for the previous transaction"));
            return None;
        }
        if !action.is_enabled(&self.view) {
            return None;
        }

        let id = self.next_id();
        self.pending_txn = Some(PendingTxn { id, action });
        self.notice = None;
        Some(SessionCommand::Execute { id, action })
    }

    pub fn refresh(&mut self) -> Option<SessionCommand> {
        if self.connected() && !self.view.is_loading {
            Some(SessionCommand::Refresh)
        } else {
            None
        }
    }

    // ========================
    // Session events
    // ========================

    pub fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected { wallet, account } => {
                self.connecting = None;
                self.account = Some(account.address);
                self.notice = Some(format!("Connected {}", wallet));
                self.wallet_name = Some(wallet);
            }
            SessionEvent::ConnectFailed { wallet, message } => {
                self.connecting = None;
                self.notice = Some(format!("{}: {}", wallet, message));
            }
            SessionEvent::Disconnected => {
                self.account = None;
                self.wallet_name = None;
            }
            SessionEvent::TransactionSettled { id } => {
                if self.pending_txn.is_some_and(|p| p.id == id) {
                    self.pending_txn = None;
                }
            }
        }
    }

    /// Take a view snapshot from the session.
    ///
    /// Snapshots published after a local disconnect are ignored.
    pub fn apply_view(&mut self, view: ViewState) {
        if self.connected() || self.connecting.is_some() {
            self.view = view;
        } else {
            self.view = ViewState {
                error: view.error,
                ..ViewState::default()
            };
        }
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}
