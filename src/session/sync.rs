//! View-state synchronizer - keeps the counter view in step with wallet and ledger
//!
//! Every operation takes `&mut self`, so at most one of them runs at a time on
//! a given synchronizer. Observers follow the view through a `watch` channel.

use tokio::sync::watch;

use crate::constants::{counter_resource_type, entry_function_id};
use crate::error::{LedgerError, WalletError};
use crate::ledger::Ledger;
use crate::models::{Account, CounterResource, EntryArg, EntryFunctionData, TransactionRequest};
use crate::wallet::Wallet;

/// Shown when reading the counter fails for any reason but absence
pub const FETCH_FAILED: &str = "Failed to fetch counter.";

/// Shown when a transaction fails without a usable message
pub const TXN_FAILED: &str = "Transaction failed";

/// Local view of one account's counter
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    /// `None` until a resource was fetched, and while it does not exist
    pub count: Option<u64>,
    pub is_loading: bool,
    pub is_txn_loading: bool,
    pub error: Option<String>,
}

/// What the screen shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Disconnected,
    Loading,
    Uninitialized,
    Active,
    Error,
}

impl ViewState {
    pub fn phase(&self, connected: bool) -> Phase {
        if !connected {
            Phase::Disconnected
        } else if self.is_loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.count.is_some() {
            Phase::Active
        } else {
            Phase::Uninitialized
        }
    }

    pub fn can_initialize(&self) -> bool {
        !self.is_txn_loading && !self.is_loading && self.count.is_none()
    }

    pub fn can_increment(&self) -> bool {
        !self.is_txn_loading && self.count.is_some()
    }

    pub fn can_decrement(&self) -> bool {
        !self.is_txn_loading && self.count.is_some_and(|c| c > 0)
    }

    pub fn can_reset(&self) -> bool {
        self.can_decrement()
    }
}

/// Counter entry functions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterAction {
    Initialize,
    Increment,
    Decrement,
    Reset,
}

impl CounterAction {
    /// Name of the entry function backing this action
    pub fn function_name(&self) -> &'static str {
        match self {
            CounterAction::Initialize => "publish",
            CounterAction::Increment => "increment",
            CounterAction::Decrement => "decrement",
            CounterAction::Reset => "reset",
        }
    }

    pub fn is_enabled(&self, view: &ViewState) -> bool {
        match self {
            CounterAction::Initialize => view.can_initialize(),
            CounterAction::Increment => view.can_increment(),
            CounterAction::Decrement => view.can_decrement(),
            CounterAction::Reset => view.can_reset(),
        }
    }
}

/// Owns the wallet, the ledger client and the view state of the session
pub struct Synchronizer<W: Wallet, L: Ledger> {
    wallet: W,
    ledger: L,
    view: watch::Sender<ViewState>,
}

impl<W: Wallet, L: Ledger> Synchronizer<W, L> {
    pub fn new(wallet: W, ledger: L) -> Self {
        let (view, _) = watch::channel(ViewState::default());
        Synchronizer { wallet, ledger, view }
    }

    /// Follow view changes
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.subscribe()
    }

    /// Snapshot of the current view
    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    pub fn account(&self) -> Option<&Account> {
        self.wallet.account()
    }

    pub fn connected(&self) -> bool {
        self.wallet.connected()
    }

    pub fn phase(&self) -> Phase {
        self.view.borrow().phase(self.connected())
    }

    fn update(&self, f: impl FnOnce(&mut ViewState)) {
        self.view.send_modify(f);
    }

    /// Connect a wallet and load its counter; a new account gets a fresh view
    pub async fn connect(&mut self, wallet_name: &str) -> Result<Account, WalletError> {
        let account = match self.wallet.connect(wallet_name).await {
            Ok(account) => account,
            Err(e) => {
                tracing::error!(wallet = wallet_name, error = %e, "Wallet connection failed");
                self.update(|view| view.error = Some(e.to_string()));
                return Err(e);
            }
        };
        self.view.send_replace(ViewState::default());
        self.fetch_counter().await;
        Ok(account)
    }

    /// Disconnect the wallet and drop everything known about the account
    pub async fn disconnect(&mut self) {
        if let Err(e) = self.wallet.disconnect().await {
            tracing::error!(error = %e, "Wallet disconnect failed");
        }
        self.view.send_replace(ViewState::default());
    }

    /// Read the counter resource of the connected account into the view
    pub async fn fetch_counter(&mut self) {
        let Some(address) = self.wallet.account().map(|a| a.address) else {
            return;
        };

        self.update(|view| {
            view.is_loading = true;
            view.error = None;
        });

        let result = self
            .ledger
            .get_account_resource(&address, &counter_resource_type())
            .await
            .and_then(|data| {
                serde_json::from_value::<CounterResource>(data)
                    .map_err(|e| LedgerError::Decode(e.to_string()))
            });

        self.update(|view| {
            match result {
                Ok(resource) => view.count = Some(resource.i),
                // Not published yet
                Err(LedgerError::NotFound { .. }) => view.count = None,
                Err(e) => {
                    tracing::error!(address = %address, error = %e, "Failed to fetch counter");
                    view.error = Some(String::from(FETCH_FAILED));
                }
            }
            view.is_loading = false;
        });
    }

    /// Sign, submit and confirm a call to a counter entry function, then refresh
    pub async fn execute_transaction(&mut self, function_name: &str, args: Vec<EntryArg>) {
        let Some(sender) = self.wallet.account().map(|a| a.address) else {
            return;
        };

        self.update(|view| {
            view.is_txn_loading = true;
            view.error = None;
        });

        let request = TransactionRequest {
            sender,
            data: EntryFunctionData {
                function: entry_function_id(function_name),
                function_arguments: args,
            },
        };

        match self.submit_and_wait(&request).await {
            Ok(()) => self.fetch_counter().await,
            Err(e) => {
                tracing::error!(function = %request.data.function, error = %e, "Transaction failed");
                let message = failure_message(&e);
                self.update(|view| view.error = Some(message));
            }
        }

        self.update(|view| view.is_txn_loading = false);
    }

    async fn submit_and_wait(&self, request: &TransactionRequest) -> Result<(), WalletError> {
        let hash = self.wallet.sign_and_submit_transaction(request).await?;
        let committed = self.ledger.wait_for_transaction(&hash).await?;
        tracing::info!(hash = %committed.hash, version = committed.version, "Transaction committed");
        Ok(())
    }

    pub async fn handle_initialize(&mut self) {
        self.execute_transaction(CounterAction::Initialize.function_name(), vec![EntryArg::U64(0)])
            .await
    }

    pub async fn handle_increment(&mut self) {
        let args = self.address_arg();
        self.execute_transaction(CounterAction::Increment.function_name(), args)
            .await
    }

    pub async fn handle_decrement(&mut self) {
        let args = self.address_arg();
        self.execute_transaction(CounterAction::Decrement.function_name(), args)
            .await
    }

    pub async fn handle_reset(&mut self) {
        self.execute_transaction(CounterAction::Reset.function_name(), Vec::new())
            .await
    }

    /// Dispatch an action to its handler
    pub async fn perform(&mut self, action: CounterAction) {
        match action {
            CounterAction::Initialize => self.handle_initialize().await,
            CounterAction::Increment => self.handle_increment().await,
            CounterAction::Decrement => self.handle_decrement().await,
            CounterAction::Reset => self.handle_reset().await,
        }
    }

    // increment/decrement take the account as an explicit argument, publish/reset do not
    fn address_arg(&self) -> Vec<EntryArg> {
        self.wallet
            .account()
            .map(|a| vec![EntryArg::Address(a.address)])
            .unwrap_or_default()
    }
}

/// User-facing text for a failed transaction; a blank reason falls back to `TXN_FAILED`
fn failure_message(error: &WalletError) -> String {
    let reason = match error {
        WalletError::Rejected(reason) => reason.as_str(),
        WalletError::Ledger(LedgerError::TransactionFailed { vm_status, .. }) => vm_status.as_str(),
        _ => return error.to_string(),
    };
    if reason.trim().is_empty() {
        String::from(TXN_FAILED)
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeChain, FakeLedger, FakeWallet};

    fn synchronizer(chain: &FakeChain) -> Synchronizer<FakeWallet, FakeLedger> {
        Synchronizer::new(chain.wallet("Petra"), chain.ledger())
    }

    async fn connected(chain: &FakeChain) -> Synchronizer<FakeWallet, FakeLedger> {
        let mut sync = synchronizer(chain);
        sync.connect("Petra").await.unwrap();
        sync
    }

    #[tokio::test]
    async fn test_fetch_without_account_is_noop() {
        let chain = FakeChain::new();
        let mut sync = synchronizer(&chain);
        sync.fetch_counter().await;
        assert_eq!(sync.view(), ViewState::default());
        assert_eq!(sync.phase(), Phase::Disconnected);
        assert_eq!(chain.reads(), 0);
    }

    #[tokio::test]
    async fn test_unpublished_counter_is_uninitialized() {
        let chain = FakeChain::new();
        let sync = connected(&chain).await;
        let view = sync.view();
        assert_eq!(view.count, None);
        assert_eq!(view.error, None);
        assert!(!view.is_loading);
        assert_eq!(sync.phase(), Phase::Uninitialized);
    }

    #[tokio::test]
    async fn test_fetch_reads_exact_value() {
        for value in [0, 7, u32::MAX as u64 + 1, u64::MAX] {
            let chain = FakeChain::new();
            chain.publish(chain.address_of("Petra"), value);
            let mut sync = connected(&chain).await;
            assert_eq!(sync.view().count, Some(value));
            assert_eq!(sync.phase(), Phase::Active);

            sync.fetch_counter().await;
            assert_eq!(sync.view().count, Some(value));
        }
    }

    #[tokio::test]
    async fn test_read_failure_sets_generic_error() {
        let chain = FakeChain::new();
        chain.publish(chain.address_of("Petra"), 5);
        let mut sync = connected(&chain).await;

        chain.fail_reads(true);
        sync.fetch_counter().await;
        let view = sync.view();
        assert_eq!(view.error.as_deref(), Some(FETCH_FAILED));
        assert!(!view.is_loading);
        assert_eq!(view.count, Some(5));
        assert_eq!(sync.phase(), Phase::Error);

        chain.fail_reads(false);
        sync.fetch_counter().await;
        assert_eq!(sync.view().error, None);
    }

    #[tokio::test]
    async fn test_counter_lifecycle() {
        let chain = FakeChain::new();
        let mut sync = connected(&chain).await;

        sync.handle_initialize().await;
        assert_eq!(sync.view().count, Some(0));

        sync.handle_increment().await;
        sync.handle_increment().await;
        assert_eq!(sync.view().count, Some(2));

        sync.handle_decrement().await;
        assert_eq!(sync.view().count, Some(1));

        sync.handle_reset().await;
        let view = sync.view();
        assert_eq!(view.count, Some(0));
        assert!(!view.is_txn_loading);
        assert_eq!(view.error, None);
    }

    #[tokio::test]
    async fn test_handlers_send_expected_arguments() {
        let chain = FakeChain::new();
        let mut sync = connected(&chain).await;
        let me = chain.address_of("Petra");

        sync.handle_initialize().await;
        sync.handle_increment().await;
        sync.handle_decrement().await;
        sync.handle_reset().await;

        let calls = chain.submitted();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0].data.function, "0x42::counter::publish");
        assert_eq!(calls[0].data.function_arguments, vec![EntryArg::U64(0)]);
        assert_eq!(calls[1].data.function, "0x42::counter::increment");
        assert_eq!(calls[1].data.function_arguments, vec![EntryArg::Address(me)]);
        assert_eq!(calls[2].data.function_arguments, vec![EntryArg::Address(me)]);
        assert_eq!(calls[3].data.function, "0x42::counter::reset");
        assert!(calls[3].data.function_arguments.is_empty());
        assert!(calls.iter().all(|c| c.sender == me));
    }

    #[tokio::test]
    async fn test_rejection_keeps_count() {
        let chain = FakeChain::new();
        chain.publish(chain.address_of("Petra"), 3);
        let mut sync = connected(&chain).await;

        chain.reject_next("User rejected the request");
        sync.handle_increment().await;

        let view = sync.view();
        assert_eq!(view.count, Some(3));
        assert!(!view.is_txn_loading);
        assert_eq!(
            view.error.as_deref(),
            Some("Transaction rejected: User rejected the request")
        );
        assert_eq!(chain.value_of(chain.address_of("Petra")), Some(3));
    }

    #[tokio::test]
    async fn test_blank_rejection_uses_generic_message() {
        let chain = FakeChain::new();
        chain.publish(chain.address_of("Petra"), 3);
        let mut sync = connected(&chain).await;

        chain.reject_next("");
        sync.handle_increment().await;

        let view = sync.view();
        assert_eq!(view.error.as_deref(), Some(TXN_FAILED));
        assert_eq!(view.count, Some(3));
        assert!(!view.is_txn_loading);
    }

    #[tokio::test]
    async fn test_on_chain_abort_surfaces_vm_status() {
        let chain = FakeChain::new();
        chain.publish(chain.address_of("Petra"), 0);
        let mut sync = connected(&chain).await;

        // Underflow aborts on chain
        sync.handle_decrement().await;
        let view = sync.view();
        assert_eq!(view.count, Some(0));
        assert!(view.error.unwrap().contains("Move abort"));
    }

    #[tokio::test]
    async fn test_transaction_without_account_is_noop() {
        let chain = FakeChain::new();
        let mut sync = synchronizer(&chain);
        sync.handle_increment().await;
        assert!(chain.submitted().is_empty());
        assert_eq!(sync.view(), ViewState::default());
    }

    #[tokio::test]
    async fn test_disconnect_clears_count() {
        let chain = FakeChain::new();
        chain.publish(chain.address_of("Petra"), 9);
        let mut sync = connected(&chain).await;
        assert_eq!(sync.view().count, Some(9));

        sync.disconnect().await;
        assert_eq!(sync.view(), ViewState::default());
        assert_eq!(sync.phase(), Phase::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_failure_reports_error() {
        let chain = FakeChain::new();
        let mut sync = synchronizer(&chain);
        assert!(sync.connect("Martian").await.is_err());
        assert!(sync.view().error.unwrap().contains("Martian"));
        assert!(!sync.connected());
    }

    #[tokio::test]
    async fn test_subscribers_see_loading_released() {
        let chain = FakeChain::new();
        let mut sync = connected(&chain).await;
        let mut rx = sync.subscribe();

        sync.handle_initialize().await;
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.count, Some(0));
        assert!(!seen.is_loading && !seen.is_txn_loading);
    }

    #[test]
    fn test_action_availability() {
        let zero = ViewState {
            count: Some(0),
            ..ViewState::default()
        };
        assert!(CounterAction::Increment.is_enabled(&zero));
        assert!(!CounterAction::Decrement.is_enabled(&zero));
        assert!(!CounterAction::Reset.is_enabled(&zero));
        assert!(!CounterAction::Initialize.is_enabled(&zero));

        let busy = ViewState {
            count: Some(4),
            is_txn_loading: true,
            ..ViewState::default()
        };
        assert!(!CounterAction::Increment.is_enabled(&busy));
        assert!(!CounterAction::Decrement.is_enabled(&busy));

        let fresh = ViewState::default();
        assert!(CounterAction::Initialize.is_enabled(&fresh));
        assert!(!CounterAction::Increment.is_enabled(&fresh));
    }
}
