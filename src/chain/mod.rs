//! Chain module - capabilities the preparation pipeline is handed by its caller
//!
//! This module provides:
//! - The node transport (`query` and `broadcast`)
//! - The keyring (address resolution, passphrase lookup, signing)
//! - The operator output channel
//! - The per-preparation signer context bundling the above with caller flags

pub mod context;
pub mod output;

pub use context::SignerContext;
pub use output::{ConsoleOutput, OperatorOutput};

use crate::error::TxResult;
use crate::tx::types::{AccAddress, BroadcastResponse, PubKey, StdSignature};

use async_trait::async_trait;

/// Query path for dry-run execution of a transaction
pub const SIMULATE_PATH: &str = "/app/simulate";

/// Query path for account metadata, keyed by address
pub const ACCOUNT_PATH: &str = "custom/acc/account";

/// Transport to a single node
///
/// Timeouts and connection handling belong to the implementation; the
/// pipeline calls each method at most once per step and never retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Run a read-only query against `path` with `data` as payload
    async fn query(&self, path: &str, data: &[u8]) -> TxResult<Vec<u8>>;

    /// Submit signed transaction bytes for inclusion
    async fn broadcast(&self, tx_bytes: &[u8]) -> TxResult<BroadcastResponse>;
}

/// Key storage and signing primitive
#[cfg_attr(test, mockall::automock)]
pub trait Keyring: Send + Sync {
    /// Resolve a signer name to its chain address
    fn address(&self, name: &str) -> TxResult<AccAddress>;

    fn public_key(&self, name: &str) -> TxResult<PubKey>;

    /// Obtain the secret needed to unlock the signer's key
    fn passphrase(&self, name: &str) -> TxResult<String>;

    fn sign(&self, name: &str, passphrase: &str, sign_bytes: &[u8]) -> TxResult<StdSignature>;
}
