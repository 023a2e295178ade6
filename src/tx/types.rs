//! Transaction envelope types shared by the builder, codec and pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bech32-style account address as resolved by the keyring
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccAddress(String);

impl AccAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque state-change intent supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Msg {
    #[serde(rename = "type")]
    pub type_url: String,
    #[serde(with = "hex_bytes")]
    pub value: Vec<u8>,
}

impl Msg {
    pub fn new(type_url: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            type_url: type_url.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
        }
    }
}

/// Fee paid by the transaction: coin amount plus gas limit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas: u64,
}

/// Public key of a signer, as raw bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey(#[serde(with = "hex_bytes")] pub Vec<u8>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    pub pub_key: PubKey,
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
}

/// The bytes a signer commits to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StdSignMsg {
    pub chain_id: String,
    pub account_number: u64,
    pub sequence: u64,
    pub fee: StdFee,
    pub msgs: Vec<Msg>,
    pub memo: String,
}

/// Canonical transaction envelope, built once and never mutated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdTx {
    pub msgs: Vec<Msg>,
    pub fee: StdFee,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<StdSignature>,
    #[serde(default)]
    pub memo: String,
}

impl StdTx {
    pub fn new(msgs: Vec<Msg>, fee: StdFee, signatures: Vec<StdSignature>, memo: String) -> Self {
        Self {
            msgs,
            fee,
            signatures,
            memo,
        }
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }
}

/// Decoded response of a `/app/simulate` query
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationResult {
    pub gas_used: u64,
    #[serde(default)]
    pub gas_wanted: u64,
    #[serde(default)]
    pub log: String,
}

/// On-chain account metadata returned by the account query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseAccount {
    pub address: AccAddress,
    pub account_number: u64,
    pub sequence: u64,
}

/// Node acknowledgment of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub hash: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub log: String,
}

/// Hex (de)serialization for byte fields
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
