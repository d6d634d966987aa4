//! Chain client: transaction submission and event subscription over alloy.
//!
//! [`ActionChain`] is the seam between the service layer and the chain.
//! The production implementation wraps an alloy WebSocket provider with a
//! local signing wallet; tests substitute mocks.

use std::sync::atomic::{AtomicU64, Ordering};

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, B256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder, WsConnect};
use alloy::rpc::types::{BlockNumberOrTag, Filter, Log};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolEvent;
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;

use super::bindings::SustainableActions;
use crate::config::GatewayConfig;
use crate::domain::{ChainSignal, RawChainEvent};
use crate::error::GatewayError;

/// Submission and subscription primitives for the actions contract.
#[async_trait]
pub trait ActionChain: Send + Sync + std::fmt::Debug {
    /// Sends a `recordAction` transaction and returns its hash without
    /// waiting for the transaction to be mined.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ChainUnavailable`] when the RPC transport
    /// fails, [`GatewayError::TransactionRejected`] when the node refuses
    /// the transaction. Neither is retried here: resubmission requires
    /// nonce management and belongs to the caller.
    async fn record_action(&self, user: Address, description: &str)
    -> Result<B256, GatewayError>;

    /// Opens a subscription for `ActionRecorded` events and returns the
    /// receiving end of a bounded channel of [`ChainSignal`]s. Events are
    /// delivered in log-stream order; when the stream ends, a final
    /// [`ChainSignal::ConnectionError`] is pushed.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ChainUnavailable`] when the subscription
    /// cannot be established.
    async fn subscribe(&self, capacity: usize)
    -> Result<mpsc::Receiver<ChainSignal>, GatewayError>;
}

/// Production [`ActionChain`] backed by an alloy WebSocket provider.
#[derive(Debug)]
pub struct AlloyActionChain {
    provider: DynProvider,
    contract_address: Address,
    // Chain id observed by the previous subscription; 0 = none yet.
    last_chain_id: AtomicU64,
}

impl AlloyActionChain {
    /// Connects the WebSocket provider and wires the signing wallet.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] when the configured private
    /// key does not parse, [`GatewayError::ChainUnavailable`] when the
    /// RPC endpoint cannot be reached.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let signer: PrivateKeySigner = config
            .private_key
            .parse()
            .map_err(|_| GatewayError::InvalidInput("PRIVATE_KEY is not a valid key".to_string()))?;
        let signer_address = signer.address();
        let wallet = EthereumWallet::from(signer);

        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_ws(WsConnect::new(config.rpc_url.clone()))
            .await
            .map_err(|e| GatewayError::ChainUnavailable(e.to_string()))?;

        tracing::info!(
            signer = %signer_address,
            contract = %config.contract_address,
            "chain provider connected"
        );

        Ok(Self {
            provider: provider.erased(),
            contract_address: config.contract_address,
            last_chain_id: AtomicU64::new(0),
        })
    }
}

#[async_trait]
impl ActionChain for AlloyActionChain {
    async fn record_action(
        &self,
        user: Address,
        description: &str,
    ) -> Result<B256, GatewayError> {
        let contract = SustainableActions::new(self.contract_address, self.provider.clone());

        // Fire-and-forget: the pending hash comes back immediately and the
        // confirmation event is the sole trigger for persistence.
        let pending = contract
            .recordAction(user, description.to_string())
            .send()
            .await
            .map_err(|e| match e {
                alloy::contract::Error::TransportError(te) => {
                    GatewayError::ChainUnavailable(te.to_string())
                }
                other => GatewayError::TransactionRejected(other.to_string()),
            })?;

        Ok(*pending.tx_hash())
    }

    async fn subscribe(
        &self,
        capacity: usize,
    ) -> Result<mpsc::Receiver<ChainSignal>, GatewayError> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .map_err(|e| GatewayError::ChainUnavailable(e.to_string()))?;

        let filter = Filter::new()
            .address(self.contract_address)
            .event_signature(SustainableActions::ActionRecorded::SIGNATURE_HASH)
            .from_block(BlockNumberOrTag::Latest);

        let subscription = self
            .provider
            .subscribe_logs(&filter)
            .await
            .map_err(|e| GatewayError::ChainUnavailable(e.to_string()))?;

        let (tx, rx) = mpsc::channel(capacity);

        let previous = self.last_chain_id.swap(chain_id, Ordering::SeqCst);
        if previous != 0 && previous != chain_id {
            let _ = tx
                .send(ChainSignal::NetworkChanged {
                    old: previous,
                    new: chain_id,
                })
                .await;
        }

        tokio::spawn(forward_logs(subscription.into_stream(), tx));

        Ok(rx)
    }
}

/// Forwards decoded logs onto the signal channel until the stream ends or
/// the consumer goes away.
///
/// Watching `tx.closed()` matters on a quiet contract: when the listener
/// stops, this returns immediately and drops the subscription instead of
/// staying parked on `stream.next()` until the next log happens to arrive.
async fn forward_logs<S>(mut stream: S, tx: mpsc::Sender<ChainSignal>)
where
    S: futures_util::Stream<Item = Log> + Unpin,
{
    loop {
        tokio::select! {
            () = tx.closed() => return,
            log = stream.next() => {
                let Some(log) = log else { break };
                match log.log_decode::<SustainableActions::ActionRecorded>() {
                    Ok(decoded) => {
                        let SustainableActions::ActionRecorded {
                            user,
                            description,
                            timestamp,
                        } = decoded.inner.data;
                        let event = RawChainEvent {
                            user,
                            description,
                            timestamp,
                            transaction_hash: log.transaction_hash,
                        };
                        if tx.send(ChainSignal::Action(event)).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "undecodable log on action filter, skipping");
                    }
                }
            }
        }
    }
    let _ = tx
        .send(ChainSignal::ConnectionError(
            "event subscription stream ended".to_string(),
        ))
        .await;
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use alloy::primitives::U256;
    use futures_util::stream;

    use super::*;

    fn recorded_log(description: &str, timestamp: u64) -> Log {
        let event = SustainableActions::ActionRecorded {
            user: Address::repeat_byte(0x11),
            description: description.to_string(),
            timestamp: U256::from(timestamp),
        };
        Log {
            inner: alloy::primitives::Log {
                address: Address::repeat_byte(0x42),
                data: event.encode_log_data(),
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn forwarding_returns_promptly_when_the_consumer_goes_away() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);

        // A quiet contract never yields a log; the closed channel alone
        // must be enough to end the task.
        let result = tokio::time::timeout(
            Duration::from_millis(200),
            forward_logs(stream::pending::<Log>(), tx),
        )
        .await;
        assert!(result.is_ok(), "forwarding stayed parked on a quiet stream");
    }

    #[tokio::test]
    async fn ended_stream_reports_a_connection_error() {
        let (tx, mut rx) = mpsc::channel(4);
        forward_logs(stream::empty::<Log>(), tx).await;

        let signal = rx.recv().await;
        assert!(matches!(signal, Some(ChainSignal::ConnectionError(_))));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn decoded_logs_arrive_in_stream_order() {
        let (tx, mut rx) = mpsc::channel(4);
        let logs = vec![
            recorded_log("planted a tree", 1_700_000_000),
            recorded_log("composted", 1_700_000_100),
        ];
        forward_logs(stream::iter(logs), tx).await;

        let Some(ChainSignal::Action(first)) = rx.recv().await else {
            panic!("expected first action signal");
        };
        assert_eq!(first.user, Address::repeat_byte(0x11));
        assert_eq!(first.description, "planted a tree");
        assert_eq!(first.timestamp, U256::from(1_700_000_000_u64));
        assert_eq!(first.transaction_hash, None);

        let Some(ChainSignal::Action(second)) = rx.recv().await else {
            panic!("expected second action signal");
        };
        assert_eq!(second.description, "composted");

        assert!(matches!(
            rx.recv().await,
            Some(ChainSignal::ConnectionError(_))
        ));
    }
}
