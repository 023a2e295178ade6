//! Shared transaction codec

use super::types::{BaseAccount, SimulationResult, StdSignMsg, StdTx};
use crate::error::{TxError, TxResult};

/// Wire codec shared by the builder, the simulator and the account lookups
pub trait TxCodec: Send + Sync {
    /// Serialize a transaction for simulation or broadcast
    fn encode_tx(&self, tx: &StdTx) -> TxResult<Vec<u8>>;

    fn decode_tx(&self, bytes: &[u8]) -> TxResult<StdTx>;

    /// Canonical bytes handed to the signing primitive
    fn sign_bytes(&self, msg: &StdSignMsg) -> TxResult<Vec<u8>>;

    /// Human-readable form of a transaction for operator output
    fn to_display(&self, tx: &StdTx) -> TxResult<String>;

    fn decode_simulation(&self, bytes: &[u8]) -> TxResult<SimulationResult>;

    fn decode_account(&self, bytes: &[u8]) -> TxResult<BaseAccount>;
}

/// JSON codec
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl TxCodec for JsonCodec {
    fn encode_tx(&self, tx: &StdTx) -> TxResult<Vec<u8>> {
        serde_json::to_vec(tx).map_err(|e| TxError::Build(format!("cannot encode tx: {}", e)))
    }

    fn decode_tx(&self, bytes: &[u8]) -> TxResult<StdTx> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn sign_bytes(&self, msg: &StdSignMsg) -> TxResult<Vec<u8>> {
        // Value maps are BTreeMaps, so re-serializing sorts every object's keys
        let canonical = serde_json::to_value(msg)
            .map_err(|e| TxError::Build(format!("cannot encode sign doc: {}", e)))?;
        serde_json::to_vec(&canonical)
            .map_err(|e| TxError::Build(format!("cannot encode sign doc: {}", e)))
    }

    fn to_display(&self, tx: &StdTx) -> TxResult<String> {
        serde_json::to_string_pretty(tx)
            .map_err(|e| TxError::Build(format!("cannot encode tx: {}", e)))
    }

    fn decode_simulation(&self, bytes: &[u8]) -> TxResult<SimulationResult> {
        serde_json::from_slice(bytes)
            .map_err(|e| TxError::Decode(format!("invalid simulation response: {}", e)))
    }

    fn decode_account(&self, bytes: &[u8]) -> TxResult<BaseAccount> {
        serde_json::from_slice(bytes)
            .map_err(|e| TxError::Decode(format!("invalid account response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::types::{Coin, Msg, StdFee};

    #[test]
    fn sign_bytes_have_sorted_keys() {
        let msg = StdSignMsg {
            chain_id: "test-1".to_string(),
            account_number: 7,
            sequence: 3,
            fee: StdFee {
                amount: vec![Coin::new("stake", 10)],
                gas: 200_000,
            },
            msgs: vec![Msg::new("bank/send", vec![1, 2])],
            memo: String::new(),
        };

        let bytes = JsonCodec.sign_bytes(&msg).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with(r#"{"account_number":7,"chain_id":"test-1","fee":"#));
        assert!(text.contains(r#""memo":"","msgs":[{"type":"bank/send","value":"0102"}],"sequence":3"#));
    }

    #[test]
    fn malformed_simulation_response_is_a_decode_error() {
        let err = JsonCodec.decode_simulation(b"\x00\x01").unwrap_err();
        assert!(matches!(err, TxError::Decode(_)));
    }
}
