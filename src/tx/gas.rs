//! Gas simulation and estimation
//!
//! A candidate transaction is dry-run through the node's simulation query and
//! the reported gas usage is scaled by the caller's adjustment factor.

use super::builder::TxBuilder;
use super::codec::TxCodec;
use super::types::Msg;
use crate::chain::{NodeClient, SignerContext, SIMULATE_PATH};
use crate::error::TxResult;

use tracing::debug;

/// Scale a simulated gas figure: `floor(adjustment * estimate)`
pub fn adjust_gas_estimate(estimate: u64, adjustment: f64) -> u64 {
    (adjustment * estimate as f64).floor() as u64
}

/// Extract the gas used from a raw simulation response
pub fn parse_query_response(codec: &dyn TxCodec, raw: &[u8]) -> TxResult<u64> {
    let result = codec.decode_simulation(raw)?;
    Ok(result.gas_used)
}

/// Simulate `tx_bytes` and return both the raw estimate and the adjusted amount
///
/// Transport errors come back unchanged; an undecodable response is a `Decode` error.
pub async fn calculate_gas(
    client: &dyn NodeClient,
    codec: &dyn TxCodec,
    tx_bytes: &[u8],
    adjustment: f64,
) -> TxResult<(u64, u64)> {
    let raw = client.query(SIMULATE_PATH, tx_bytes).await?;
    let estimate = parse_query_response(codec, &raw)?;
    let adjusted = adjust_gas_estimate(estimate, adjustment);

    debug!(
        "Simulation used {} gas, adjusted to {} (factor {})",
        estimate, adjusted, adjustment
    );
    crate::metrics::record_simulation(adjusted);

    Ok((estimate, adjusted))
}

/// Simulate `msgs` signed by `name` with the given gas limit
pub async fn simulate_msgs(
    builder: &TxBuilder,
    ctx: &SignerContext,
    name: &str,
    msgs: &[Msg],
    gas: u64,
) -> TxResult<(u64, u64)> {
    let candidate = builder.clone().with_gas(gas);
    let tx_bytes = candidate.build_with_pubkey(ctx.keyring(), name, msgs)?;
    calculate_gas(ctx.client(), builder.codec(), &tx_bytes, ctx.gas_adjustment()).await
}

/// Return a builder whose gas is the adjusted simulation estimate for `msgs`
pub async fn enrich_with_gas(
    builder: TxBuilder,
    ctx: &SignerContext,
    name: &str,
    msgs: &[Msg],
) -> TxResult<TxBuilder> {
    let (_, adjusted) = simulate_msgs(&builder, ctx, name, msgs, 0).await?;
    Ok(builder
        .with_gas(adjusted)
        .with_gas_adjustment(ctx.gas_adjustment()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{MockKeyring, MockNodeClient};
    use crate::error::TxError;
    use crate::tx::codec::JsonCodec;
    use crate::tx::types::PubKey;
    use std::sync::Arc;

    fn keyring() -> MockKeyring {
        let mut keyring = MockKeyring::new();
        keyring
            .expect_public_key()
            .returning(|_| Ok(PubKey(vec![1; 33])));
        keyring
    }

    fn msgs() -> Vec<Msg> {
        vec![Msg::new("bank/send", vec![4, 5, 6])]
    }

    #[test]
    fn adjustment_floors_the_product() {
        assert_eq!(adjust_gas_estimate(100_000, 1.5), 150_000);
        assert_eq!(adjust_gas_estimate(100_000, 1.0), 100_000);
        assert_eq!(adjust_gas_estimate(3, 1.5), 4);
        assert_eq!(adjust_gas_estimate(0, 2.0), 0);
        assert_eq!(adjust_gas_estimate(1_000, 0.5), 500);
    }

    #[test]
    fn adjustment_is_deterministic() {
        let first = adjust_gas_estimate(123_457, 1.3);
        let second = adjust_gas_estimate(123_457, 1.3);
        assert_eq!(first, second);
        assert_eq!(first, (1.3 * 123_457f64).floor() as u64);
    }

    #[tokio::test]
    async fn calculate_gas_queries_simulate_path() {
        let mut client = MockNodeClient::new();
        client
            .expect_query()
            .withf(|path, data| path == SIMULATE_PATH && data == b"txbytes")
            .times(1)
            .returning(|_, _| Ok(br#"{"gas_used": 80000}"#.to_vec()));

        let (estimate, adjusted) = calculate_gas(&client, &JsonCodec, b"txbytes", 1.25)
            .await
            .unwrap();
        assert_eq!(estimate, 80_000);
        assert_eq!(adjusted, 100_000);
    }

    #[tokio::test]
    async fn undecodable_response_is_a_decode_error() {
        let mut client = MockNodeClient::new();
        client
            .expect_query()
            .returning(|_, _| Ok(b"garbage".to_vec()));

        let err = calculate_gas(&client, &JsonCodec, b"tx", 1.0).await.unwrap_err();
        assert!(matches!(err, TxError::Decode(_)));
    }

    #[tokio::test]
    async fn simulation_transport_failure_is_returned_unchanged() {
        let failure = TxError::RemoteQuery {
            path: SIMULATE_PATH.to_string(),
            message: "timeout".to_string(),
        };
        let returned = failure.clone();

        let mut client = MockNodeClient::new();
        client
            .expect_query()
            .returning(move |_, _| Err(returned.clone()));

        let err = calculate_gas(&client, &JsonCodec, b"tx", 1.0).await.unwrap_err();
        assert_eq!(err, failure);
    }

    #[tokio::test]
    async fn enrich_simulates_with_zero_gas_and_sets_adjusted_value() {
        let mut client = MockNodeClient::new();
        client
            .expect_query()
            .withf(|path, data| {
                let tx = JsonCodec.decode_tx(data).unwrap();
                path == SIMULATE_PATH && tx.fee.gas == 0 && tx.signatures[0].signature.is_empty()
            })
            .times(1)
            .returning(|_, _| Ok(br#"{"gas_used": 100000}"#.to_vec()));

        let ctx = SignerContext::new("alice", Arc::new(client), Arc::new(keyring()))
            .with_gas_adjustment(1.5);
        let builder = TxBuilder::json("test-1").with_gas(500);

        let enriched = enrich_with_gas(builder, &ctx, "alice", &msgs()).await.unwrap();
        assert_eq!(enriched.gas(), 150_000);
        assert_eq!(enriched.gas_adjustment(), 1.5);
    }

    #[tokio::test]
    async fn simulate_msgs_reports_raw_and_adjusted() {
        let mut client = MockNodeClient::new();
        client
            .expect_query()
            .withf(|_, data| JsonCodec.decode_tx(data).unwrap().fee.gas == 42)
            .times(1)
            .returning(|_, _| Ok(br#"{"gas_used": 1000, "gas_wanted": 42}"#.to_vec()));

        let ctx = SignerContext::new("alice", Arc::new(client), Arc::new(keyring()))
            .with_gas_adjustment(2.0);
        let builder = TxBuilder::json("test-1");

        let (estimate, adjusted) = simulate_msgs(&builder, &ctx, "alice", &msgs(), 42)
            .await
            .unwrap();
        assert_eq!((estimate, adjusted), (1_000, 2_000));
    }
}
