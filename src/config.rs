//! Configuration of the caller-facing knobs
//!
//! Loads configuration from TOML files with environment variable substitution.

use crate::chain::{Keyring, NodeClient, SignerContext};
use crate::error::{TxError, TxResult};
use crate::tx::codec::TxCodec;
use crate::tx::types::Coin;
use crate::tx::TxBuilder;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Transaction preparation settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TxConfig {
    pub chain_id: String,
    /// Name of the signing key
    pub from: String,
    /// Gas limit; 0 estimates automatically
    #[serde(default)]
    pub gas: u64,
    #[serde(default = "default_gas_adjustment")]
    pub gas_adjustment: f64,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub generate_only: bool,
    /// 0 resolves from chain
    #[serde(default)]
    pub account_number: u64,
    /// 0 resolves from chain
    #[serde(default)]
    pub sequence: u64,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub fees: Vec<Coin>,
}

fn default_gas_adjustment() -> f64 {
    1.0
}

impl TxConfig {
    /// Load settings from the file named by `TXPREP_CONFIG`
    pub fn load() -> Result<Self> {
        let config_path = env::var("TXPREP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/default.toml"));

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&config_str)
    }

    /// Parse and validate settings, substituting `${VAR}` references first
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config_str = substitute_env_vars(input)?;

        let config: TxConfig =
            toml::from_str(&config_str).with_context(|| "Failed to parse configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> TxResult<()> {
        if self.chain_id.is_empty() {
            return Err(TxError::Config("chain_id must not be empty".to_string()));
        }
        if self.from.is_empty() {
            return Err(TxError::Config("from must name a signing key".to_string()));
        }
        if !self.gas_adjustment.is_finite() || self.gas_adjustment <= 0.0 {
            return Err(TxError::Config(format!(
                "gas_adjustment must be a positive number, got {}",
                self.gas_adjustment
            )));
        }
        if self.dry_run && self.generate_only {
            tracing::warn!("dry_run and generate_only both set; dry_run takes precedence");
        }

        Ok(())
    }

    /// Builder seeded with the configured chain, account fields, gas, fees and memo
    pub fn tx_builder(&self, codec: Arc<dyn TxCodec>) -> TxBuilder {
        TxBuilder::new(self.chain_id.clone(), codec)
            .with_account_number(self.account_number)
            .with_sequence(self.sequence)
            .with_gas(self.gas)
            .with_gas_adjustment(self.gas_adjustment)
            .with_fees(self.fees.clone())
            .with_memo(self.memo.clone())
    }

    /// Signer context carrying the configured flags
    pub fn signer_context(
        &self,
        client: Arc<dyn NodeClient>,
        keyring: Arc<dyn Keyring>,
    ) -> SignerContext {
        SignerContext::new(self.from.clone(), client, keyring)
            .with_dry_run(self.dry_run)
            .with_generate_only(self.generate_only)
            .with_gas(self.gas)
            .with_gas_adjustment(self.gas_adjustment)
    }
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .context("Invalid substitution pattern")?;

    let result = re.replace_all(input, |caps: &regex::Captures| {
        env::var(&caps[1]).unwrap_or_default()
    });

    Ok(result.into_owned())
}
