//! Signer context for one preparation cycle

use super::{ConsoleOutput, Keyring, NodeClient, OperatorOutput};
use crate::error::TxResult;
use crate::tx::types::{AccAddress, BroadcastResponse};

use std::fmt;
use std::sync::Arc;

/// Everything the pipeline needs to know about who signs and how to reach the node
///
/// Owned by the caller for a single preparation; builders and contexts are
/// never shared between concurrent preparations.
#[derive(Clone)]
pub struct SignerContext {
    /// Name of the signing key
    from_name: String,
    /// Estimate and report gas, but never sign or broadcast
    dry_run: bool,
    /// Emit the unsigned transaction instead of signing it
    generate_only: bool,
    /// Caller supplied an explicit gas limit
    gas_set: bool,
    /// Multiplier applied to simulated gas
    gas_adjustment: f64,
    client: Arc<dyn NodeClient>,
    keyring: Arc<dyn Keyring>,
    output: Arc<dyn OperatorOutput>,
}

impl SignerContext {
    /// Create a new context with diagnostics going to stderr
    pub fn new(
        from_name: impl Into<String>,
        client: Arc<dyn NodeClient>,
        keyring: Arc<dyn Keyring>,
    ) -> Self {
        Self {
            from_name: from_name.into(),
            dry_run: false,
            generate_only: false,
            gas_set: false,
            gas_adjustment: 1.0,
            client,
            keyring,
            output: Arc::new(ConsoleOutput),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_generate_only(mut self, generate_only: bool) -> Self {
        self.generate_only = generate_only;
        self
    }

    /// Record whether the caller gave an explicit gas limit (`gas != 0`)
    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas_set = gas != 0;
        self
    }

    pub fn with_gas_adjustment(mut self, gas_adjustment: f64) -> Self {
        self.gas_adjustment = gas_adjustment;
        self
    }

    pub fn with_output(mut self, output: Arc<dyn OperatorOutput>) -> Self {
        self.output = output;
        self
    }

    pub fn from_name(&self) -> &str {
        &self.from_name
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn generate_only(&self) -> bool {
        self.generate_only
    }

    pub fn gas_set(&self) -> bool {
        self.gas_set
    }

    pub fn gas_adjustment(&self) -> f64 {
        self.gas_adjustment
    }

    pub fn client(&self) -> &dyn NodeClient {
        self.client.as_ref()
    }

    pub fn keyring(&self) -> &dyn Keyring {
        self.keyring.as_ref()
    }

    pub fn output(&self) -> &dyn OperatorOutput {
        self.output.as_ref()
    }

    /// Resolve the signer name to its chain address
    pub fn from_address(&self) -> TxResult<AccAddress> {
        self.keyring.address(&self.from_name)
    }

    /// Hand signed bytes to the node
    pub async fn broadcast(&self, tx_bytes: &[u8]) -> TxResult<BroadcastResponse> {
        self.client.broadcast(tx_bytes).await
    }
}

impl fmt::Debug for SignerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerContext")
            .field("from_name", &self.from_name)
            .field("dry_run", &self.dry_run)
            .field("generate_only", &self.generate_only)
            .field("gas_set", &self.gas_set)
            .field("gas_adjustment", &self.gas_adjustment)
            .finish_non_exhaustive()
    }
}
