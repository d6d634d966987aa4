//! Action submitter: validates input and fires the recording transaction.

use std::sync::Arc;

use alloy::primitives::B256;

use crate::chain::ActionChain;
use crate::domain::parse_address;
use crate::error::GatewayError;

/// Sends `recordAction` transactions on behalf of API clients.
///
/// Submission is fire-and-forget: the returned hash identifies a pending
/// transaction, and the confirmation event, not this call, is what
/// creates the persisted record.
#[derive(Debug, Clone)]
pub struct ActionSubmitter {
    chain: Arc<dyn ActionChain>,
}

impl ActionSubmitter {
    /// Creates a new submitter over the given chain client.
    #[must_use]
    pub fn new(chain: Arc<dyn ActionChain>) -> Self {
        Self { chain }
    }

    /// Validates the request and submits the transaction, returning its
    /// hash without waiting for it to be mined.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] for a malformed address or
    /// empty description (checked before any network call),
    /// [`GatewayError::ChainUnavailable`] or
    /// [`GatewayError::TransactionRejected`] when submission fails.
    /// Failed submissions are not retried here.
    pub async fn submit(
        &self,
        user_address: &str,
        description: &str,
    ) -> Result<B256, GatewayError> {
        let user = parse_address(user_address)?;
        if description.trim().is_empty() {
            return Err(GatewayError::InvalidInput(
                "description must not be empty".to_string(),
            ));
        }

        let tx_hash = self.chain.record_action(user, description).await?;
        tracing::info!(
            tx_hash = %tx_hash,
            user = %user.to_checksum(None),
            "action transaction submitted"
        );
        Ok(tx_hash)
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use alloy::primitives::Address;
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::ChainSignal;

    /// Mock chain whose transactions take `mine_delay` to "mine". The
    /// hash is returned immediately; `mined` flips only after the delay.
    #[derive(Debug)]
    struct SlowMiningChain {
        record_calls: AtomicUsize,
        mine_delay: Duration,
        mined: Arc<AtomicBool>,
    }

    impl SlowMiningChain {
        fn new(mine_delay: Duration) -> Self {
            Self {
                record_calls: AtomicUsize::new(0),
                mine_delay,
                mined: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    #[async_trait]
    impl ActionChain for SlowMiningChain {
        async fn record_action(
            &self,
            _user: Address,
            _description: &str,
        ) -> Result<B256, GatewayError> {
            self.record_calls.fetch_add(1, Ordering::SeqCst);
            let mined = Arc::clone(&self.mined);
            let delay = self.mine_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                mined.store(true, Ordering::SeqCst);
            });
            Ok(B256::repeat_byte(0xcd))
        }

        async fn subscribe(
            &self,
            capacity: usize,
        ) -> Result<mpsc::Receiver<ChainSignal>, GatewayError> {
            let (_tx, rx) = mpsc::channel(capacity);
            Ok(rx)
        }
    }

    const VALID_ADDRESS: &str = "0x00000000219ab540356cBB839Cbe05303d7705Fa";

    #[tokio::test]
    async fn submit_returns_hash_before_mining() {
        let chain = Arc::new(SlowMiningChain::new(Duration::from_secs(5)));
        let submitter = ActionSubmitter::new(Arc::clone(&chain) as Arc<dyn ActionChain>);

        let result = submitter.submit(VALID_ADDRESS, "composted").await;
        let Ok(hash) = result else {
            panic!("valid submission should succeed");
        };
        assert_eq!(hash, B256::repeat_byte(0xcd));
        // The call completed while the transaction is still unmined.
        assert!(!chain.mined.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn malformed_address_never_reaches_the_chain() {
        let chain = Arc::new(SlowMiningChain::new(Duration::ZERO));
        let submitter = ActionSubmitter::new(Arc::clone(&chain) as Arc<dyn ActionChain>);

        for bad in ["", "0x1234", "not-an-address", "00000000219ab540356cBB839Cbe05303d7705Fa00"] {
            let result = submitter.submit(bad, "recycled").await;
            assert!(matches!(result, Err(GatewayError::InvalidInput(_))));
        }
        assert_eq!(chain.record_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_description_is_rejected_before_any_network_call() {
        let chain = Arc::new(SlowMiningChain::new(Duration::ZERO));
        let submitter = ActionSubmitter::new(Arc::clone(&chain) as Arc<dyn ActionChain>);

        for empty in ["", "   ", "\t\n"] {
            let result = submitter.submit(VALID_ADDRESS, empty).await;
            assert!(matches!(result, Err(GatewayError::InvalidInput(_))));
        }
        assert_eq!(chain.record_calls.load(Ordering::SeqCst), 0);
    }
}
