//! Transaction assembly: the full prepare, sign and broadcast flow
//!
//! Steps run strictly in order and the first error ends the flow:
//! account resolution, optional gas estimation, then one of dry-run exit,
//! generate-only exit, or signing followed by broadcast. Nothing is signed or
//! sent once any earlier step has failed.

use super::account::prepare_tx_builder;
use super::builder::TxBuilder;
use super::gas::enrich_with_gas;
use super::sender::broadcast_tx;
use super::types::{BroadcastResponse, Msg, StdTx};
use crate::chain::SignerContext;
use crate::error::{TxError, TxResult};

use std::fmt;
use tracing::{debug, error, warn};

/// Terminal state reached by `complete_and_broadcast`
#[derive(Debug, Clone, PartialEq)]
pub enum BroadcastOutcome {
    /// Gas was estimated and reported; nothing was signed
    DryRun { gas: u64 },
    /// The unsigned transaction was emitted to the operator
    GenerateOnly(StdTx),
    /// The signed transaction was accepted by the node
    Broadcast(BroadcastResponse),
}

/// Pipeline step, used to label failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolveAccount,
    EstimateGas,
    Build,
    Sign,
    Broadcast,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ResolveAccount => "resolve_account",
            Stage::EstimateGas => "estimate_gas",
            Stage::Build => "build",
            Stage::Sign => "sign",
            Stage::Broadcast => "broadcast",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log and count a failed step, handing the error back untouched
fn failed(stage: Stage, err: TxError) -> TxError {
    if err.is_remote() {
        warn!("Transaction preparation failed at {}: {}", stage, err);
    } else {
        error!("Transaction preparation failed at {}: {}", stage, err);
    }
    crate::metrics::record_failure(stage.as_str(), err.kind());
    err
}

/// Resolve the signer's account, estimate gas if needed, sign `msgs` and broadcast
///
/// Gas is estimated when the caller asked for a dry run or did not supply
/// gas. A dry run reports the estimate even if gas was supplied, then stops
/// before signing.
pub async fn complete_and_broadcast(
    builder: TxBuilder,
    ctx: &SignerContext,
    msgs: &[Msg],
) -> TxResult<BroadcastOutcome> {
    let mut builder = prepare_tx_builder(builder, ctx)
        .await
        .map_err(|e| failed(Stage::ResolveAccount, e))?;

    let auto_gas = ctx.dry_run() || !ctx.gas_set();
    if auto_gas {
        builder = enrich_with_gas(builder, ctx, ctx.from_name(), msgs)
            .await
            .map_err(|e| failed(Stage::EstimateGas, e))?;
        ctx.output().gas_estimate(builder.gas());
    }

    if ctx.dry_run() {
        debug!("Dry run complete with gas {}", builder.gas());
        crate::metrics::record_dry_run();
        return Ok(BroadcastOutcome::DryRun { gas: builder.gas() });
    }

    if ctx.generate_only() {
        let tx = emit_unsigned(&builder, ctx, msgs).map_err(|e| failed(Stage::Build, e))?;
        crate::metrics::record_generate_only();
        return Ok(BroadcastOutcome::GenerateOnly(tx));
    }

    let name = ctx.from_name();
    let passphrase = ctx
        .keyring()
        .passphrase(name)
        .map_err(|e| failed(Stage::Sign, e))?;
    let tx_bytes = builder
        .build_and_sign(ctx.keyring(), name, &passphrase, msgs)
        .map_err(|e| failed(Stage::Sign, e))?;

    let response = broadcast_tx(ctx, &tx_bytes)
        .await
        .map_err(|e| failed(Stage::Broadcast, e))?;

    Ok(BroadcastOutcome::Broadcast(response))
}

/// Build an unsigned transaction, estimating gas first if the builder has none
pub async fn build_unsigned_std_tx(
    builder: TxBuilder,
    ctx: &SignerContext,
    msgs: &[Msg],
) -> TxResult<StdTx> {
    let builder = resolve_for_unsigned(builder, ctx, msgs).await?;
    unsigned_from(&builder, msgs).map_err(|e| failed(Stage::Build, e))
}

/// Build an unsigned transaction and write it to the operator output
pub async fn print_unsigned_std_tx(
    builder: TxBuilder,
    ctx: &SignerContext,
    msgs: &[Msg],
) -> TxResult<StdTx> {
    let builder = resolve_for_unsigned(builder, ctx, msgs).await?;
    emit_unsigned(&builder, ctx, msgs).map_err(|e| failed(Stage::Build, e))
}

async fn resolve_for_unsigned(
    builder: TxBuilder,
    ctx: &SignerContext,
    msgs: &[Msg],
) -> TxResult<TxBuilder> {
    let mut builder = prepare_tx_builder(builder, ctx)
        .await
        .map_err(|e| failed(Stage::ResolveAccount, e))?;

    if builder.gas() == 0 {
        builder = enrich_with_gas(builder, ctx, ctx.from_name(), msgs)
            .await
            .map_err(|e| failed(Stage::EstimateGas, e))?;
        ctx.output().gas_estimate(builder.gas());
    }

    Ok(builder)
}

fn unsigned_from(builder: &TxBuilder, msgs: &[Msg]) -> TxResult<StdTx> {
    let sign_msg = builder.build(msgs)?;
    Ok(StdTx::new(sign_msg.msgs, sign_msg.fee, Vec::new(), sign_msg.memo))
}

fn emit_unsigned(builder: &TxBuilder, ctx: &SignerContext, msgs: &[Msg]) -> TxResult<StdTx> {
    let tx = unsigned_from(builder, msgs)?;
    let rendered = builder.codec().to_display(&tx)?;
    ctx.output().unsigned_tx(&rendered);
    Ok(tx)
}
