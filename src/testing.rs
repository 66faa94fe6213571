//! In-memory ledger and wallet used by the unit tests
//!
//! `FakeChain` executes the counter module's entry functions against a map of
//! published values, so tests observe the same effects a node would produce.
//! `MockNode` is a loopback HTTP server for tests that go through `RestClient`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::error::{LedgerError, WalletError};
use crate::ledger::{CommittedTransaction, Ledger};
use crate::models::{Account, AccountAddress, EntryArg, TransactionHash, TransactionRequest};
use crate::wallet::Wallet;

#[derive(Default)]
struct ChainState {
    counters: HashMap<AccountAddress, u64>,
    outcomes: HashMap<TransactionHash, Result<u64, String>>,
    submitted: Vec<TransactionRequest>,
    reject_next: Option<String>,
    fail_reads: bool,
    reads: usize,
}

#[derive(Clone, Default)]
pub struct FakeChain {
    state: Arc<Mutex<ChainState>>,
}

impl FakeChain {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap()
    }

    pub fn wallet(&self, name: &str) -> FakeWallet {
        FakeWallet {
            chain: self.clone(),
            names: vec![name.to_string()],
            account: None,
        }
    }

    pub fn ledger(&self) -> FakeLedger {
        FakeLedger { chain: self.clone() }
    }

    /// Deterministic address for a wallet name
    pub fn address_of(&self, name: &str) -> AccountAddress {
        let mut key = [0u8; 32];
        for (slot, byte) in key.iter_mut().zip(name.bytes()) {
            *slot = byte;
        }
        AccountAddress::from_ed25519_public_key(&key)
    }

    pub fn publish(&self, address: AccountAddress, value: u64) {
        self.state().counters.insert(address, value);
    }

    pub fn value_of(&self, address: AccountAddress) -> Option<u64> {
        self.state().counters.get(&address).copied()
    }

    pub fn reject_next(&self, message: &str) {
        self.state().reject_next = Some(message.to_string());
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state().fail_reads = fail;
    }

    pub fn reads(&self) -> usize {
        self.state().reads
    }

    pub fn submitted(&self) -> Vec<TransactionRequest> {
        self.state().submitted.clone()
    }

    /// Run an entry function the way the counter module would
    fn execute(state: &mut ChainState, request: &TransactionRequest) -> Result<(), String> {
        let function = request
            .data
            .function
            .rsplit("::")
            .next()
            .unwrap_or_default();
        let target = match request.data.function_arguments.first() {
            Some(EntryArg::Address(address)) => *address,
            _ => request.sender,
        };
        let abort = |code: u64| format!("Move abort in 0x42::counter: {:#x}", code);

        match function {
            "publish" => {
                if state.counters.contains_key(&request.sender) {
                    return Err(abort(0));
                }
                let initial = match request.data.function_arguments.first() {
                    Some(EntryArg::U64(value)) => *value,
                    _ => return Err(String::from("NUMBER_OF_ARGUMENTS_MISMATCH")),
                };
                state.counters.insert(request.sender, initial);
            }
            "increment" => {
                let value = state.counters.get_mut(&target).ok_or_else(|| abort(1))?;
                *value = value.checked_add(1).ok_or_else(|| abort(2))?;
            }
            "decrement" => {
                let value = state.counters.get_mut(&target).ok_or_else(|| abort(1))?;
                *value = value.checked_sub(1).ok_or_else(|| abort(3))?;
            }
            "reset" => {
                let value = state.counters.get_mut(&request.sender).ok_or_else(|| abort(1))?;
                *value = 0;
            }
            other => return Err(format!("FUNCTION_RESOLUTION_FAILURE: {}", other)),
        }
        Ok(())
    }
}

pub struct FakeWallet {
    chain: FakeChain,
    names: Vec<String>,
    account: Option<Account>,
}

#[async_trait]
impl Wallet for FakeWallet {
    fn wallets(&self) -> Vec<String> {
        self.names.clone()
    }

    async fn connect(&mut self, name: &str) -> Result<Account, WalletError> {
        if !self.names.iter().any(|n| n == name) {
            return Err(WalletError::UnknownWallet(name.to_string()));
        }
        let account = Account {
            address: self.chain.address_of(name),
            public_key: String::from("0x00"),
        };
        self.account = Some(account.clone());
        Ok(account)
    }

    async fn disconnect(&mut self) -> Result<(), WalletError> {
        self.account = None;
        Ok(())
    }

    fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    async fn sign_and_submit_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionHash, WalletError> {
        if self.account.is_none() {
            return Err(WalletError::NotConnected);
        }

        let mut state = self.chain.state();
        if let Some(message) = state.reject_next.take() {
            return Err(WalletError::Rejected(message));
        }

        state.submitted.push(request.clone());
        let version = state.submitted.len() as u64;
        let hash = TransactionHash(format!("0x{:064x}", version));
        let outcome = FakeChain::execute(&mut state, request).map(|()| version);
        state.outcomes.insert(hash.clone(), outcome);
        Ok(hash)
    }
}

pub struct FakeLedger {
    chain: FakeChain,
}

#[async_trait]
impl Ledger for FakeLedger {
    async fn get_account_resource(
        &self,
        address: &AccountAddress,
        _resource_type: &str,
    ) -> Result<serde_json::Value, LedgerError> {
        let mut state = self.chain.state();
        state.reads += 1;
        if state.fail_reads {
            return Err(LedgerError::from_response(503, String::from("node unavailable"), None));
        }
        match state.counters.get(address) {
            Some(value) => Ok(serde_json::json!({ "i": value.to_string() })),
            None => Err(LedgerError::NotFound {
                message: format!("Resource not found by Address({})", address),
            }),
        }
    }

    async fn wait_for_transaction(&self, hash: &TransactionHash) -> Result<CommittedTransaction, LedgerError> {
        let state = self.chain.state();
        match state.outcomes.get(hash) {
            Some(Ok(version)) => Ok(CommittedTransaction {
                hash: hash.clone(),
                version: *version,
                vm_status: String::from("Executed successfully"),
            }),
            Some(Err(vm_status)) => Err(LedgerError::TransactionFailed {
                hash: hash.clone(),
                vm_status: vm_status.clone(),
            }),
            None => Err(LedgerError::Timeout { hash: hash.clone() }),
        }
    }
}

/// A request as seen by `MockNode`
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Maps a request and the number of times its path was hit (this one
/// included) to a status and a JSON body
type Responder = dyn Fn(&RecordedRequest, usize) -> (u16, String) + Send + Sync;

/// Fullnode stand-in on a random loopback port, one request per connection
pub struct MockNode {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockNode {
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&RecordedRequest, usize) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let respond: Arc<Responder> = Arc::new(respond);

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let respond = respond.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, respond.as_ref(), &recorded).await;
                });
            }
        });

        MockNode { addr, requests }
    }

    /// Base URL to hand to `RestClient::with_base_url`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve(
    mut stream: TcpStream,
    respond: &Responder,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = (header_end + content_length).min(buf.len());
    let request = RecordedRequest {
        method,
        path,
        body: String::from_utf8_lossy(&buf[header_end..body_end]).to_string(),
    };

    let hits = {
        let mut requests = recorded.lock().unwrap();
        requests.push(request.clone());
        requests.iter().filter(|r| r.path == request.path).count()
    };
    let (status, body) = respond(&request, hits);

    let reason = match status {
        200 => "OK",
        202 => "Accepted",
        400 => "Bad Request",
        404 => "Not Found",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
