//! Operator-visible diagnostic channel

use std::io::{self, Write};

/// Where the pipeline reports non-error diagnostics to the person running it
pub trait OperatorOutput: Send + Sync {
    /// Report the gas chosen by automatic estimation
    fn gas_estimate(&self, gas: u64);

    /// Emit a transaction that was generated but not signed
    fn unsigned_tx(&self, rendered: &str);
}

/// Writes the gas estimate to stderr and unsigned transactions to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput;

impl OperatorOutput for ConsoleOutput {
    fn gas_estimate(&self, gas: u64) {
        let _ = writeln!(io::stderr(), "estimated gas = {}", gas);
    }

    fn unsigned_tx(&self, rendered: &str) {
        let _ = writeln!(io::stdout(), "{}", rendered);
    }
}
