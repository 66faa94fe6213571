//! Render state - data structure sent from App layer to UI for rendering

use crate::constants::{MODULE_ADDRESS, MODULE_NAME, NETWORK};
use crate::models::AccountAddress;
use crate::session::{CounterAction, Phase, ViewState};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Header
    pub network: String,
    pub module: String,

    // Wallet
    pub wallets: Vec<String>,
    pub connecting: Option<String>,
    pub wallet_name: Option<String>,
    pub account: Option<AccountAddress>,

    // Counter
    pub phase: Phase,
    pub view: ViewState,
    /// Action of the transaction in flight, if any
    pub pending_action: Option<CounterAction>,

    // Status bar
    pub notice: Option<String>,

    // Popups
    pub show_help: bool,
}

impl RenderState {
    pub fn connected(&self) -> bool {
        self.account.is_some()
    }

    /// Whether the key for `action` currently does anything
    pub fn action_enabled(&self, action: CounterAction) -> bool {
        self.connected() && self.pending_action.is_none() && action.is_enabled(&self.view)
    }
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            network: String::from(NETWORK.as_str()),
            module: format!("{}::{}", MODULE_ADDRESS, MODULE_NAME),
            wallets: Vec::new(),
            connecting: None,
            wallet_name: None,
            account: None,
            phase: Phase::Disconnected,
            view: ViewState::default(),
            pending_action: None,
            notice: None,
            show_help: false,
        }
    }
}
