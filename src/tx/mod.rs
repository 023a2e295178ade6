//! Transaction preparation: account resolution, gas estimation, signing and broadcast

pub mod account;
pub mod assembler;
pub mod builder;
pub mod codec;
pub mod gas;
pub mod sender;
pub mod types;

pub use account::prepare_tx_builder;
pub use assembler::{
    build_unsigned_std_tx, complete_and_broadcast, print_unsigned_std_tx, BroadcastOutcome, Stage,
};
pub use builder::TxBuilder;
pub use codec::{JsonCodec, TxCodec};
pub use gas::{adjust_gas_estimate, calculate_gas, enrich_with_gas, simulate_msgs};
pub use sender::broadcast_tx;
