//! Transaction builder
//!
//! `TxBuilder` is a plain configuration record. Every `with_*` call consumes
//! the builder and returns its successor, so resolved fields flow through the
//! pipeline by value and no step keeps hold of an earlier state.

use super::codec::{JsonCodec, TxCodec};
use super::types::{Coin, Msg, StdFee, StdSignMsg, StdSignature, StdTx};
use crate::chain::Keyring;
use crate::error::{TxError, TxResult};

use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct TxBuilder {
    chain_id: String,
    /// 0 means "resolve from chain"
    account_number: u64,
    /// 0 means "resolve from chain"
    sequence: u64,
    /// 0 means "estimate automatically"
    gas: u64,
    gas_adjustment: f64,
    fees: Vec<Coin>,
    memo: String,
    codec: Arc<dyn TxCodec>,
}

impl TxBuilder {
    /// Create a builder for `chain_id` using the given codec
    pub fn new(chain_id: impl Into<String>, codec: Arc<dyn TxCodec>) -> Self {
        Self {
            chain_id: chain_id.into(),
            account_number: 0,
            sequence: 0,
            gas: 0,
            gas_adjustment: 1.0,
            fees: Vec::new(),
            memo: String::new(),
            codec,
        }
    }

    /// Create a builder using the JSON codec
    pub fn json(chain_id: impl Into<String>) -> Self {
        Self::new(chain_id, Arc::new(JsonCodec::new()))
    }

    pub fn with_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = chain_id.into();
        self
    }

    pub fn with_account_number(mut self, account_number: u64) -> Self {
        self.account_number = account_number;
        self
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = gas;
        self
    }

    pub fn with_gas_adjustment(mut self, gas_adjustment: f64) -> Self {
        self.gas_adjustment = gas_adjustment;
        self
    }

    pub fn with_fees(mut self, fees: Vec<Coin>) -> Self {
        self.fees = fees;
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn account_number(&self) -> u64 {
        self.account_number
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn gas(&self) -> u64 {
        self.gas
    }

    pub fn gas_adjustment(&self) -> f64 {
        self.gas_adjustment
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn codec(&self) -> &dyn TxCodec {
        self.codec.as_ref()
    }

    /// Fee carried by transactions built from this builder
    pub fn fee(&self) -> StdFee {
        StdFee {
            amount: self.fees.clone(),
            gas: self.gas,
        }
    }

    /// Assemble the message bundle a signer commits to
    pub fn build(&self, msgs: &[Msg]) -> TxResult<StdSignMsg> {
        if self.chain_id.is_empty() {
            return Err(TxError::Build("chain ID required but not specified".to_string()));
        }
        if msgs.is_empty() {
            return Err(TxError::Build("at least one message is required".to_string()));
        }

        Ok(StdSignMsg {
            chain_id: self.chain_id.clone(),
            account_number: self.account_number,
            sequence: self.sequence,
            fee: self.fee(),
            msgs: msgs.to_vec(),
            memo: self.memo.clone(),
        })
    }

    /// Build, sign with the named key and encode the transaction
    pub fn build_and_sign(
        &self,
        keyring: &dyn Keyring,
        name: &str,
        passphrase: &str,
        msgs: &[Msg],
    ) -> TxResult<Vec<u8>> {
        if self.gas == 0 {
            return Err(TxError::Build("gas must be set before signing".to_string()));
        }
        let sign_msg = self.build(msgs)?;
        let sign_bytes = self.codec.sign_bytes(&sign_msg)?;
        let signature = keyring.sign(name, passphrase, &sign_bytes)?;

        debug!(
            "Signed tx for chain {} (account {}, sequence {}, gas {})",
            sign_msg.chain_id, sign_msg.account_number, sign_msg.sequence, sign_msg.fee.gas
        );

        let tx = StdTx::new(sign_msg.msgs, sign_msg.fee, vec![signature], sign_msg.memo);
        self.codec.encode_tx(&tx)
    }

    /// Build and encode the transaction carrying the signer's public key but no signature
    pub fn build_with_pubkey(&self, keyring: &dyn Keyring, name: &str, msgs: &[Msg]) -> TxResult<Vec<u8>> {
        let sign_msg = self.build(msgs)?;
        let pub_key = keyring.public_key(name)?;

        let placeholder = StdSignature {
            pub_key,
            signature: Vec::new(),
        };
        let tx = StdTx::new(sign_msg.msgs, sign_msg.fee, vec![placeholder], sign_msg.memo);
        self.codec.encode_tx(&tx)
    }
}

impl fmt::Debug for TxBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxBuilder")
            .field("chain_id", &self.chain_id)
            .field("account_number", &self.account_number)
            .field("sequence", &self.sequence)
            .field("gas", &self.gas)
            .field("gas_adjustment", &self.gas_adjustment)
            .field("fees", &self.fees)
            .field("memo", &self.memo)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MockKeyring;
    use crate::tx::types::PubKey;

    fn msgs() -> Vec<Msg> {
        vec![Msg::new("bank/send", vec![1, 2, 3])]
    }

    #[test]
    fn with_methods_return_updated_copies() {
        let original = TxBuilder::json("test-1");
        let updated = original.clone().with_gas(50_000).with_sequence(4);

        assert_eq!(original.gas(), 0);
        assert_eq!(original.sequence(), 0);
        assert_eq!(updated.gas(), 50_000);
        assert_eq!(updated.sequence(), 4);
        assert_eq!(updated.chain_id(), "test-1");
    }

    #[test]
    fn build_rejects_empty_messages() {
        let builder = TxBuilder::json("test-1");
        let err = builder.build(&[]).unwrap_err();
        assert!(matches!(err, TxError::Build(_)));
    }

    #[test]
    fn build_rejects_missing_chain_id() {
        let builder = TxBuilder::json("");
        let err = builder.build(&msgs()).unwrap_err();
        assert!(matches!(err, TxError::Build(_)));
    }

    #[test]
    fn build_and_sign_attaches_signature() {
        let mut keyring = MockKeyring::new();
        keyring
            .expect_sign()
            .withf(|name, passphrase, _| name == "alice" && passphrase == "secret")
            .times(1)
            .returning(|_, _, _| {
                Ok(StdSignature {
                    pub_key: PubKey(vec![9; 33]),
                    signature: vec![7; 64],
                })
            });

        let builder = TxBuilder::json("test-1")
            .with_account_number(1)
            .with_sequence(2)
            .with_gas(100_000);
        let bytes = builder.build_and_sign(&keyring, "alice", "secret", &msgs()).unwrap();

        let tx = JsonCodec.decode_tx(&bytes).unwrap();
        assert!(tx.is_signed());
        assert_eq!(tx.signatures[0].signature, vec![7; 64]);
        assert_eq!(tx.fee.gas, 100_000);
    }

    #[test]
    fn build_and_sign_refuses_zero_gas() {
        let mut keyring = MockKeyring::new();
        keyring.expect_sign().never();

        let builder = TxBuilder::json("test-1").with_account_number(1).with_sequence(2);
        let err = builder
            .build_and_sign(&keyring, "alice", "secret", &msgs())
            .unwrap_err();
        assert_eq!(err, TxError::Build("gas must be set before signing".to_string()));
    }

    #[test]
    fn build_with_pubkey_leaves_signature_empty() {
        let mut keyring = MockKeyring::new();
        keyring
            .expect_public_key()
            .times(1)
            .returning(|_| Ok(PubKey(vec![2; 33])));
        keyring.expect_sign().never();

        let builder = TxBuilder::json("test-1");
        let bytes = builder.build_with_pubkey(&keyring, "alice", &msgs()).unwrap();

        let tx = JsonCodec.decode_tx(&bytes).unwrap();
        assert_eq!(tx.signatures.len(), 1);
        assert_eq!(tx.signatures[0].pub_key, PubKey(vec![2; 33]));
        assert!(tx.signatures[0].signature.is_empty());
    }
}
