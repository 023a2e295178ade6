//! txprep - client-side transaction preparation
//!
//! Resolves the signer's account number and sequence, estimates gas through a
//! node's simulation query, builds and signs the transaction envelope, and
//! submits it to the node. Transport, key storage and operator output are
//! injected by the caller.

pub mod chain;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod tx;

pub use chain::{ConsoleOutput, Keyring, NodeClient, OperatorOutput, SignerContext};
pub use config::TxConfig;
pub use error::{TxError, TxResult};
pub use tx::{
    build_unsigned_std_tx, complete_and_broadcast, print_unsigned_std_tx, BroadcastOutcome,
    TxBuilder,
};
