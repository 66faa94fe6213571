use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};
use thiserror::Error;

/// Scheme byte appended to a public key before hashing it into an address
const ED25519_SCHEME: u8 = 0x00;

/// Target network
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Devnet,
    Testnet,
    Mainnet,
    Local,
}

impl Network {
    pub fn as_str(&self) -> &str {
        match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
            Network::Local => "local",
        }
    }

    /// Base URL of the fullnode REST API, without a trailing slash
    pub fn node_url(&self) -> &str {
        match self {
            Network::Devnet => "https://fullnode.devnet.aptoslabs.com/v1",
            Network::Testnet => "https://fullnode.testnet.aptoslabs.com/v1",
            Network::Mainnet => "https://fullnode.mainnet.aptoslabs.com/v1",
            Network::Local => "http://127.0.0.1:8080/v1",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AddressParseError {
    #[error("address is empty")]
    Empty,
    #[error("address is longer than 64 hex digits")]
    TooLong,
    #[error("address is not valid hex: {0}")]
    InvalidHex(String),
}

/// A 32-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountAddress([u8; 32]);

impl AccountAddress {
    pub const LENGTH: usize = 32;

    /// Derive the address controlled by a single Ed25519 key
    pub fn from_ed25519_public_key(public_key: &[u8; 32]) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(public_key);
        hasher.update([ED25519_SCHEME]);
        AccountAddress(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Long form: `0x` followed by 64 hex digits
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Abbreviated form for narrow displays, e.g. `0x1a2b...9f0e`
    pub fn short(&self) -> String {
        let full = self.to_hex();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }
}

impl FromStr for AccountAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits.strip_prefix("0x").unwrap_or(digits);
        if digits.is_empty() {
            return Err(AddressParseError::Empty);
        }
        if digits.len() > Self::LENGTH * 2 {
            return Err(AddressParseError::TooLong);
        }

        // Short forms such as 0x1 are left-padded
        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        Ok(AccountAddress(bytes))
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.to_hex())
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The identity a wallet exposes once connected
#[derive(Clone, Debug, PartialEq)]
pub struct Account {
    pub address: AccountAddress,
    /// `0x`-prefixed hex of the Ed25519 public key
    pub public_key: String,
}

/// A positional entry-function argument.
///
/// The JSON submission format carries u64 values and addresses as strings.
#[derive(Clone, Debug, PartialEq)]
pub enum EntryArg {
    U64(u64),
    Address(AccountAddress),
}

impl Serialize for EntryArg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntryArg::U64(value) => serializer.serialize_str(&value.to_string()),
            EntryArg::Address(address) => address.serialize(serializer),
        }
    }
}

/// Entry-function call the wallet is asked to sign
#[derive(Clone, Debug, PartialEq)]
pub struct EntryFunctionData {
    /// `<address>::<module>::<function>`
    pub function: String,
    pub function_arguments: Vec<EntryArg>,
}

/// A transaction as handed to the wallet
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionRequest {
    pub sender: AccountAddress,
    pub data: EntryFunctionData,
}

/// Hash of a submitted transaction
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHash(pub String);

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-chain counter record
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CounterResource {
    #[serde(deserialize_with = "u64_from_string")]
    pub i: u64,
}

/// Move u64 values arrive as decimal strings; plain numbers are accepted too
pub fn u64_from_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
        Raw::Number(n) => Ok(n),
    }
}
