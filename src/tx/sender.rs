//! Broadcast of signed transactions

use super::types::BroadcastResponse;
use crate::chain::SignerContext;
use crate::error::TxResult;

use tracing::info;

/// Submit signed transaction bytes through the context's node client
///
/// The bytes are passed through as is; the node's acknowledgment or error is
/// returned unchanged. Acceptance by the node does not imply inclusion.
pub async fn broadcast_tx(ctx: &SignerContext, tx_bytes: &[u8]) -> TxResult<BroadcastResponse> {
    let response = ctx.broadcast(tx_bytes).await?;

    info!(
        "Transaction sent: {} (code {}, {} bytes)",
        response.hash,
        response.code,
        tx_bytes.len()
    );
    crate::metrics::record_broadcast();

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{MockKeyring, MockNodeClient};
    use crate::error::TxError;
    use std::sync::Arc;

    #[tokio::test]
    async fn bytes_are_passed_through() {
        let mut client = MockNodeClient::new();
        client
            .expect_broadcast()
            .withf(|bytes| bytes == b"signed")
            .times(1)
            .returning(|_| {
                Ok(BroadcastResponse {
                    hash: "ABCD".to_string(),
                    code: 0,
                    log: String::new(),
                })
            });

        let ctx = SignerContext::new("alice", Arc::new(client), Arc::new(MockKeyring::new()));
        let response = broadcast_tx(&ctx, b"signed").await.unwrap();
        assert_eq!(response.hash, "ABCD");
    }

    #[tokio::test]
    async fn node_rejection_is_returned_unchanged() {
        let mut client = MockNodeClient::new();
        client
            .expect_broadcast()
            .returning(|_| Err(TxError::Broadcast("tx already in mempool".to_string())));

        let ctx = SignerContext::new("alice", Arc::new(client), Arc::new(MockKeyring::new()));
        let err = broadcast_tx(&ctx, b"signed").await.unwrap_err();
        assert_eq!(err, TxError::Broadcast("tx already in mempool".to_string()));
    }
}
