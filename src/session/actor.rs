//! Session actor - runs wallet and ledger calls in the Tokio runtime

use tokio::sync::{mpsc, watch};

use crate::ledger::Ledger;
use crate::messages::{SessionCommand, SessionEvent};
use crate::session::{Synchronizer, ViewState};
use crate::storage::Storage;
use crate::wallet::Wallet;

/// Session actor that processes wallet and counter commands in order
pub struct SessionActor<W: Wallet, L: Ledger> {
    sync: Synchronizer<W, L>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    storage: Option<Storage>,
}

impl<W: Wallet, L: Ledger> SessionActor<W, L> {
    pub fn new(sync: Synchronizer<W, L>, event_tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        SessionActor {
            sync,
            event_tx,
            storage: None,
        }
    }

    /// Remember the connected wallet across runs
    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Receiver for view updates
    pub fn view(&self) -> watch::Receiver<ViewState> {
        self.sync.subscribe()
    }

    fn remember(&self, wallet: Option<&str>) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.remember_wallet(wallet) {
                tracing::warn!(error = %e, "Could not save session");
            }
        }
    }

    /// Run the actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<SessionCommand>) {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                SessionCommand::Connect { wallet } => {
                    let event = match self.sync.connect(&wallet).await {
                        Ok(account) => {
                            self.remember(Some(&wallet));
                            SessionEvent::Connected { wallet, account }
                        }
                        Err(e) => SessionEvent::ConnectFailed {
                            wallet,
                            message: e.to_string(),
                        },
                    };
                    let _ = self.event_tx.send(event);
                }

                SessionCommand::Disconnect => {
                    self.sync.disconnect().await;
                    self.remember(None);
                    let _ = self.event_tx.send(SessionEvent::Disconnected);
                }

                SessionCommand::Refresh => self.sync.fetch_counter().await,

                SessionCommand::Execute { id, action } => {
                    tracing::info!(id, ?action, "Executing counter transaction");
                    self.sync.perform(action).await;
                    let _ = self.event_tx.send(SessionEvent::TransactionSettled { id });
                }

                SessionCommand::Shutdown => break,
            }
        }
        tracing::info!("Session actor stopped");
    }
}
