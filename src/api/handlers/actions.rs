//! Action handlers: submit, list all, list by user.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{ActionDto, SubmitActionRequest, SubmitActionResponse};
use crate::app_state::AppState;
use crate::domain::parse_address;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /actions` — Submit a sustainable action to the chain.
///
/// Responds as soon as the transaction is accepted by the node. The
/// database row is written later, by the event listener, when the
/// contract confirms the action.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidInput`] on a malformed address or empty
/// description, [`GatewayError::ChainUnavailable`] /
/// [`GatewayError::TransactionRejected`] when submission fails.
#[utoipa::path(
    post,
    path = "/actions",
    tag = "Actions",
    summary = "Submit a sustainable action",
    description = "Sends a recordAction transaction and returns its hash without waiting for confirmation. The persisted record is created by the event listener once the contract emits ActionRecorded.",
    request_body = SubmitActionRequest,
    responses(
        (status = 201, description = "Transaction submitted", body = SubmitActionResponse),
        (status = 400, description = "Invalid address or missing field", body = ErrorResponse),
        (status = 500, description = "Submission failed", body = ErrorResponse),
    )
)]
pub async fn submit_action(
    State(state): State<AppState>,
    Json(req): Json<SubmitActionRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let tx_hash = state
        .submitter
        .submit(&req.user_address, &req.description)
        .await?;

    // parse_address succeeded inside submit; reparse for the checksummed echo.
    let user_address = parse_address(&req.user_address)?.to_checksum(None);

    let response = SubmitActionResponse {
        message: "action submitted; it will be persisted once confirmed on-chain".to_string(),
        blockchain_tx_hash: format!("{tx_hash:#x}"),
        user_address,
        description: req.description,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /actions` — List all confirmed actions, newest first.
///
/// # Errors
///
/// Returns [`GatewayError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/actions",
    tag = "Actions",
    summary = "List confirmed actions",
    description = "Returns every confirmed action ordered by timestamp descending.",
    responses(
        (status = 200, description = "Confirmed actions", body = Vec<ActionDto>),
        (status = 500, description = "Store unavailable", body = ErrorResponse),
    )
)]
pub async fn list_actions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let actions = state.store.list_all().await?;
    let data: Vec<ActionDto> = actions.into_iter().map(ActionDto::from).collect();
    Ok(Json(data))
}

/// `GET /actions/:userAddress` — List one user's confirmed actions.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidInput`] on a malformed address,
/// [`GatewayError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/actions/{userAddress}",
    tag = "Actions",
    summary = "List a user's confirmed actions",
    description = "Returns the given user's confirmed actions ordered by timestamp descending. A user with no actions yields an empty array.",
    params(
        ("userAddress" = String, Path, description = "42-character 0x-prefixed account address"),
    ),
    responses(
        (status = 200, description = "The user's confirmed actions", body = Vec<ActionDto>),
        (status = 400, description = "Malformed address", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse),
    )
)]
pub async fn list_actions_by_user(
    State(state): State<AppState>,
    Path(user_address): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    // Rows are stored checksummed; normalize before querying so lookups
    // are case-insensitive.
    let address = parse_address(&user_address)?.to_checksum(None);
    let actions = state.store.list_by_user(&address).await?;
    let data: Vec<ActionDto> = actions.into_iter().map(ActionDto::from).collect();
    Ok(Json(data))
}

/// Action routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/actions", post(submit_action).get(list_actions))
        .route("/actions/{user_address}", get(list_actions_by_user))
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use alloy::primitives::{Address, B256};
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::*;
    use crate::chain::ActionChain;
    use crate::domain::{Action, ChainSignal, LogFailureSink};
    use crate::persistence::ActionStore;
    use crate::service::{ActionSubmitter, EventListener};

    #[derive(Debug, Default)]
    struct NoopChain {
        record_calls: AtomicUsize,
    }

    #[async_trait]
    impl ActionChain for NoopChain {
        async fn record_action(
            &self,
            _user: Address,
            _description: &str,
        ) -> Result<B256, GatewayError> {
            self.record_calls.fetch_add(1, Ordering::SeqCst);
            Ok(B256::repeat_byte(0xef))
        }

        async fn subscribe(
            &self,
            capacity: usize,
        ) -> Result<mpsc::Receiver<ChainSignal>, GatewayError> {
            let (_tx, rx) = mpsc::channel(capacity);
            Ok(rx)
        }
    }

    #[derive(Debug, Default)]
    struct CountingStore {
        list_by_user_calls: AtomicUsize,
        queried_addresses: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ActionStore for CountingStore {
        async fn insert(
            &self,
            user_address: &str,
            description: &str,
            timestamp: i64,
        ) -> Result<Action, GatewayError> {
            Ok(Action {
                id: 1,
                user_address: user_address.to_string(),
                description: description.to_string(),
                timestamp,
            })
        }

        async fn list_all(&self) -> Result<Vec<Action>, GatewayError> {
            Ok(Vec::new())
        }

        async fn list_by_user(&self, user_address: &str) -> Result<Vec<Action>, GatewayError> {
            self.list_by_user_calls.fetch_add(1, Ordering::SeqCst);
            self.queried_addresses
                .lock()
                .unwrap()
                .push(user_address.to_string());
            Ok(Vec::new())
        }
    }

    fn make_state(chain: &Arc<NoopChain>, store: &Arc<CountingStore>) -> AppState {
        let chain_dyn = Arc::clone(chain) as Arc<dyn ActionChain>;
        let store_dyn = Arc::clone(store) as Arc<dyn ActionStore>;
        AppState {
            submitter: Arc::new(ActionSubmitter::new(Arc::clone(&chain_dyn))),
            store: Arc::clone(&store_dyn),
            listener: Arc::new(EventListener::new(
                chain_dyn,
                store_dyn,
                Arc::new(LogFailureSink),
                4,
            )),
        }
    }

    #[tokio::test]
    async fn malformed_path_address_is_rejected_before_the_store() {
        let chain = Arc::new(NoopChain::default());
        let store = Arc::new(CountingStore::default());
        let state = make_state(&chain, &store);

        let result =
            list_actions_by_user(State(state), Path("not-an-address".to_string())).await;
        assert!(matches!(result, Err(GatewayError::InvalidInput(_))));
        assert_eq!(store.list_by_user_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn lowercase_path_address_is_checksummed_for_the_lookup() {
        let chain = Arc::new(NoopChain::default());
        let store = Arc::new(CountingStore::default());
        let state = make_state(&chain, &store);

        let result = list_actions_by_user(
            State(state),
            Path("0x00000000219ab540356cbb839cbe05303d7705fa".to_string()),
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(store.list_by_user_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            store.queried_addresses.lock().unwrap().as_slice(),
            ["0x00000000219ab540356cBB839Cbe05303d7705Fa".to_string()]
        );
    }
}
