//! App actor - message loop processing UI events and session updates

use tokio::sync::{mpsc, watch};

use crate::app::state::AppState;
use crate::messages::{RenderState, SessionCommand, SessionEvent, UiEvent};
use crate::session::ViewState;

/// App actor that processes UI events and session updates
pub struct AppActor {
    state: AppState,
    session_tx: mpsc::UnboundedSender<SessionCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
    auto_connect: Option<String>,
}

impl AppActor {
    pub fn new(
        wallets: Vec<String>,
        session_tx: mpsc::UnboundedSender<SessionCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(wallets),
            session_tx,
            render_tx,
            auto_connect: None,
        }
    }

    /// Connect this wallet as soon as the loop starts
    pub fn with_auto_connect(mut self, wallet: Option<String>) -> Self {
        self.auto_connect = wallet;
        self
    }

    fn send(&self, cmd: Option<SessionCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.session_tx.send(cmd);
        }
    }

    fn render(&self) {
        let _ = self.render_tx.send(self.state.to_render_state());
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut session_rx: mpsc::UnboundedReceiver<SessionEvent>,
        mut view_rx: watch::Receiver<ViewState>,
    ) {
        if let Some(wallet) = self.auto_connect.take() {
            tracing::info!(wallet = %wallet, "Auto-connecting");
            let cmd = self.state.connect_wallet_by_name(wallet);
            self.send(cmd);
        }

        // Send initial render state
        self.render();

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.session_tx.send(SessionCommand::Shutdown);
                        break;
                    }
                }
                Some(event) = session_rx.recv() => {
                    self.state.handle_session_event(event);
                }
                Ok(()) = view_rx.changed() => {
                    let view = view_rx.borrow_and_update().clone();
                    self.state.apply_view(view);
                }
                else => break,
            }
            self.render();
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Wallet
            UiEvent::ConnectWallet(index) => {
                let cmd = self.state.connect_wallet(index);
                self.send(cmd);
            }
            UiEvent::Disconnect => {
                let cmd = self.state.disconnect();
                self.send(cmd);
            }

            // Counter
            UiEvent::Counter(action) => {
                let cmd = self.state.prepare_action(action);
                self.send(cmd);
            }
            UiEvent::Refresh => {
                let cmd = self.state.refresh();
                self.send(cmd);
            }

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
