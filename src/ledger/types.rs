//! Wire types of the fullnode REST API

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::{u64_from_string, AccountAddress, EntryArg, EntryFunctionData, TransactionHash};

/// `GET /accounts/{address}/resource/{type}`
#[derive(Debug, Deserialize)]
pub struct ResourceResponse {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub data: serde_json::Value,
}

/// `GET /accounts/{address}`
#[derive(Debug, Deserialize)]
pub struct AccountData {
    #[serde(deserialize_with = "u64_from_string")]
    pub sequence_number: u64,
    pub authentication_key: String,
}

/// `GET /estimate_gas_price`
#[derive(Debug, Deserialize)]
pub struct GasEstimation {
    pub gas_estimate: u64,
}

/// Error body returned with any non-success status
#[derive(Debug, Deserialize)]
pub struct NodeErrorBody {
    pub message: String,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub vm_error_code: Option<u64>,
}

impl NodeErrorBody {
    /// Build the error for a failed response, falling back to the raw text
    pub fn into_error(status: u16, body: &str) -> LedgerError {
        match serde_json::from_str::<NodeErrorBody>(body) {
            Ok(parsed) => LedgerError::from_response(status, parsed.message, parsed.error_code),
            Err(_) => {
                let message = if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.trim().to_string()
                };
                LedgerError::from_response(status, message, None)
            }
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub payload_type: &'static str,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<EntryArg>,
}

impl From<&EntryFunctionData> for EntryFunctionPayload {
    fn from(data: &EntryFunctionData) -> Self {
        EntryFunctionPayload {
            payload_type: "entry_function_payload",
            function: data.function.clone(),
            type_arguments: Vec::new(),
            arguments: data.function_arguments.clone(),
        }
    }
}

/// Submission body without an authenticator; also the input of
/// `POST /transactions/encode_submission`
#[derive(Clone, Debug, Serialize)]
pub struct UnsignedTransaction {
    pub sender: AccountAddress,
    pub sequence_number: String,
    pub max_gas_amount: String,
    pub gas_unit_price: String,
    pub expiration_timestamp_secs: String,
    pub payload: EntryFunctionPayload,
}

#[derive(Clone, Debug, Serialize)]
pub struct Ed25519Authenticator {
    #[serde(rename = "type")]
    pub signature_type: &'static str,
    pub public_key: String,
    pub signature: String,
}

impl Ed25519Authenticator {
    pub fn new(public_key: &[u8], signature: &[u8]) -> Self {
        Ed25519Authenticator {
            signature_type: "ed25519_signature",
            public_key: format!("0x{}", hex::encode(public_key)),
            signature: format!("0x{}", hex::encode(signature)),
        }
    }
}

/// `POST /transactions`
#[derive(Clone, Debug, Serialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub raw: UnsignedTransaction,
    pub signature: Ed25519Authenticator,
}

/// Response of a successful submission
#[derive(Clone, Debug, Deserialize)]
pub struct PendingTransaction {
    pub hash: TransactionHash,
}

/// `GET /transactions/by_hash/{hash}`, reduced to the fields we read
#[derive(Clone, Debug, Deserialize)]
pub struct TransactionStatus {
    #[serde(rename = "type")]
    pub kind: String,
    pub hash: TransactionHash,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub vm_status: Option<String>,
}

/// A transaction that made it into the ledger and executed successfully
#[derive(Clone, Debug, PartialEq)]
pub struct CommittedTransaction {
    pub hash: TransactionHash,
    pub version: u64,
    pub vm_status: String,
}

impl TransactionStatus {
    pub fn is_pending(&self) -> bool {
        self.kind == "pending_transaction"
    }

    /// Turn a terminal status into the committed record or the abort error
    pub fn into_committed(self) -> Result<CommittedTransaction, LedgerError> {
        let vm_status = self.vm_status.unwrap_or_else(|| String::from("unknown status"));
        if self.success != Some(true) {
            return Err(LedgerError::TransactionFailed {
                hash: self.hash,
                vm_status,
            });
        }

        let version = self
            .version
            .as_deref()
            .unwrap_or("0")
            .parse()
            .map_err(|e| LedgerError::Decode(format!("bad transaction version: {}", e)))?;
        Ok(CommittedTransaction {
            hash: self.hash,
            version,
            vm_status,
        })
    }
}
