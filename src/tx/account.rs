//! Account resolution for the signer
//!
//! Handles:
//! - Checking that the signer's account exists on chain
//! - Filling in the account number when the builder has none
//! - Filling in the sequence when the builder has none

use super::builder::TxBuilder;
use super::codec::TxCodec;
use super::types::{AccAddress, BaseAccount};
use crate::chain::{NodeClient, SignerContext, ACCOUNT_PATH};
use crate::error::{TxError, TxResult};

use tracing::debug;

/// Make sure the builder carries the signer's account number and sequence
///
/// Each field still at zero costs exactly one account query; fields already
/// set are left untouched and cost nothing. The first failure is returned as is.
pub async fn prepare_tx_builder(mut builder: TxBuilder, ctx: &SignerContext) -> TxResult<TxBuilder> {
    let from = ctx.from_address()?;
    ensure_account_exists(ctx.client(), &from).await?;

    if builder.account_number() == 0 {
        let number = account_number(ctx.client(), builder.codec(), &from).await?;
        debug!("Resolved account number {} for {}", number, from);
        builder = builder.with_account_number(number);
    }

    if builder.sequence() == 0 {
        let sequence = account_sequence(ctx.client(), builder.codec(), &from).await?;
        debug!("Resolved sequence {} for {}", sequence, from);
        builder = builder.with_sequence(sequence);
    }

    Ok(builder)
}

/// Fail with `AccountNotFound` unless the node knows the address
pub async fn ensure_account_exists(client: &dyn NodeClient, address: &AccAddress) -> TxResult<()> {
    let raw = client.query(ACCOUNT_PATH, address.as_bytes()).await?;
    if raw.is_empty() {
        return Err(TxError::AccountNotFound {
            address: address.to_string(),
        });
    }
    Ok(())
}

pub async fn account_number(
    client: &dyn NodeClient,
    codec: &dyn TxCodec,
    address: &AccAddress,
) -> TxResult<u64> {
    query_account(client, codec, address)
        .await
        .map(|account| account.account_number)
}

pub async fn account_sequence(
    client: &dyn NodeClient,
    codec: &dyn TxCodec,
    address: &AccAddress,
) -> TxResult<u64> {
    query_account(client, codec, address)
        .await
        .map(|account| account.sequence)
}

/// Fetch and decode the account record for `address`
pub async fn query_account(
    client: &dyn NodeClient,
    codec: &dyn TxCodec,
    address: &AccAddress,
) -> TxResult<BaseAccount> {
    let raw = client.query(ACCOUNT_PATH, address.as_bytes()).await?;
    if raw.is_empty() {
        return Err(TxError::AccountNotFound {
            address: address.to_string(),
        });
    }
    codec.decode_account(&raw)
}
