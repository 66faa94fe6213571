//! Wallet adapter backed by private key files

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};

use crate::constants::{MAX_GAS_AMOUNT, TXN_EXPIRATION_SECS};
use crate::error::WalletError;
use crate::ledger::types::{Ed25519Authenticator, EntryFunctionPayload, SignedTransaction, UnsignedTransaction};
use crate::ledger::RestClient;
use crate::models::{Account, AccountAddress, TransactionHash, TransactionRequest};
use crate::storage::WalletProfile;
use crate::wallet::Wallet;

/// The key and identity of the connected profile
struct Connection {
    name: String,
    key: SigningKey,
    account: Account,
}

pub struct KeyfileWallet {
    profiles: Vec<WalletProfile>,
    client: RestClient,
    connection: Option<Connection>,
}

impl KeyfileWallet {
    pub fn new(profiles: Vec<WalletProfile>, client: RestClient) -> Self {
        KeyfileWallet {
            profiles,
            client,
            connection: None,
        }
    }
}

#[async_trait]
impl Wallet for KeyfileWallet {
    fn wallets(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.name.clone()).collect()
    }

    async fn connect(&mut self, name: &str) -> Result<Account, WalletError> {
        let profile = self
            .profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| WalletError::UnknownWallet(name.to_string()))?;

        let key = load_signing_key(&profile.private_key_file)?;
        let public_key = key.verifying_key().to_bytes();
        let address = profile
            .account
            .unwrap_or_else(|| AccountAddress::from_ed25519_public_key(&public_key));
        let account = Account {
            address,
            public_key: format!("0x{}", hex::encode(public_key)),
        };

        tracing::info!(wallet = name, address = %address, "Wallet connected");
        self.connection = Some(Connection {
            name: name.to_string(),
            key,
            account: account.clone(),
        });
        Ok(account)
    }

    async fn disconnect(&mut self) -> Result<(), WalletError> {
        if let Some(connection) = self.connection.take() {
            tracing::info!(wallet = %connection.name, "Wallet disconnected");
        }
        Ok(())
    }

    fn account(&self) -> Option<&Account> {
        self.connection.as_ref().map(|c| &c.account)
    }

    async fn sign_and_submit_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionHash, WalletError> {
        let connection = self.connection.as_ref().ok_or(WalletError::NotConnected)?;
        if request.sender != connection.account.address {
            return Err(WalletError::Rejected(format!(
                "sender {} is not the connected account",
                request.sender
            )));
        }

        let sequence_number = self.client.account_sequence_number(&request.sender).await?;
        let gas_unit_price = self.client.estimate_gas_price().await?;
        let expiration = chrono::Utc::now().timestamp().max(0) as u64 + TXN_EXPIRATION_SECS;

        let raw = UnsignedTransaction {
            sender: request.sender,
            sequence_number: sequence_number.to_string(),
            max_gas_amount: MAX_GAS_AMOUNT.to_string(),
            gas_unit_price: gas_unit_price.to_string(),
            expiration_timestamp_secs: expiration.to_string(),
            payload: EntryFunctionPayload::from(&request.data),
        };

        let message = self.client.encode_submission(&raw).await?;
        let signature = connection.key.sign(&message);
        let signed = SignedTransaction {
            raw,
            signature: Ed25519Authenticator::new(
                &connection.key.verifying_key().to_bytes(),
                &signature.to_bytes(),
            ),
        };

        let pending = self.client.submit_transaction(&signed).await?;
        tracing::info!(
            hash = %pending.hash,
            function = %request.data.function,
            sequence_number,
            "Transaction submitted"
        );
        Ok(pending.hash)
    }
}

fn load_signing_key(path: &Path) -> Result<SigningKey, WalletError> {
    let text = fs::read_to_string(path)
        .map_err(|e| WalletError::InvalidKey(format!("{}: {}", path.display(), e)))?;
    parse_private_key(&text)
}

/// Parse a hex private key, as written by the Aptos CLI or exported from a
/// browser wallet (`ed25519-priv-0x...`, `0x...` or bare hex)
pub fn parse_private_key(text: &str) -> Result<SigningKey, WalletError> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix("ed25519-priv-").unwrap_or(trimmed);
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);

    let mut secret = [0u8; 32];
    hex::decode_to_slice(digits, &mut secret)
        .map_err(|e| WalletError::InvalidKey(e.to_string()))?;
    Ok(SigningKey::from_bytes(&secret))
}
