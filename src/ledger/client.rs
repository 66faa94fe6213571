//! REST client for the fullnode API

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::constants::{HTTP_TIMEOUT, TXN_POLL_INTERVAL, TXN_WAIT_TIMEOUT};
use crate::error::LedgerError;
use crate::ledger::types::{
    AccountData, CommittedTransaction, GasEstimation, NodeErrorBody, PendingTransaction,
    ResourceResponse, SignedTransaction, TransactionStatus, UnsignedTransaction,
};
use crate::ledger::Ledger;
use crate::models::{AccountAddress, Network, TransactionHash};

/// Thin wrapper around a `reqwest::Client` bound to one node
#[derive(Clone, Debug)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
    wait_timeout: Duration,
}

impl RestClient {
    pub fn new(network: Network) -> Self {
        Self::with_base_url(network.node_url())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        RestClient {
            client: create_client(),
            base_url,
            poll_interval: TXN_POLL_INTERVAL,
            wait_timeout: TXN_WAIT_TIMEOUT,
        }
    }

    /// Override how `wait_for_transaction` polls
    pub fn with_wait_policy(mut self, poll_interval: Duration, wait_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.wait_timeout = wait_timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LedgerError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        decode_response(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, LedgerError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        decode_response(response).await
    }

    /// Current sequence number of an account
    pub async fn account_sequence_number(&self, address: &AccountAddress) -> Result<u64, LedgerError> {
        let account: AccountData = self.get_json(&format!("accounts/{}", address)).await?;
        Ok(account.sequence_number)
    }

    pub async fn estimate_gas_price(&self) -> Result<u64, LedgerError> {
        let estimation: GasEstimation = self.get_json("estimate_gas_price").await?;
        Ok(estimation.gas_estimate)
    }

    /// Ask the node for the BCS signing message of a submission
    pub async fn encode_submission(&self, txn: &UnsignedTransaction) -> Result<Vec<u8>, LedgerError> {
        let encoded: String = self.post_json("transactions/encode_submission", txn).await?;
        let digits = encoded.strip_prefix("0x").unwrap_or(&encoded);
        hex::decode(digits).map_err(|e| LedgerError::Decode(format!("signing message: {}", e)))
    }

    pub async fn submit_transaction(&self, txn: &SignedTransaction) -> Result<PendingTransaction, LedgerError> {
        self.post_json("transactions", txn).await
    }

    pub async fn transaction_by_hash(&self, hash: &TransactionHash) -> Result<TransactionStatus, LedgerError> {
        self.get_json(&format!("transactions/by_hash/{}", hash)).await
    }
}

#[async_trait]
impl Ledger for RestClient {
    async fn get_account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<serde_json::Value, LedgerError> {
        let resource: ResourceResponse = self
            .get_json(&format!("accounts/{}/resource/{}", address, resource_type))
            .await?;
        Ok(resource.data)
    }

    async fn wait_for_transaction(&self, hash: &TransactionHash) -> Result<CommittedTransaction, LedgerError> {
        let started = Instant::now();
        loop {
            match self.transaction_by_hash(hash).await {
                Ok(status) if !status.is_pending() => return status.into_committed(),
                Ok(_) => {}
                // Not indexed yet
                Err(LedgerError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }

            if started.elapsed() >= self.wait_timeout {
                return Err(LedgerError::Timeout { hash: hash.clone() });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Decode a success body as `T`, or a failure body as a `LedgerError`
async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, LedgerError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(NodeErrorBody::into_error(status.as_u16(), &body));
    }
    serde_json::from_str(&body).map_err(|e| LedgerError::Decode(e.to_string()))
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
