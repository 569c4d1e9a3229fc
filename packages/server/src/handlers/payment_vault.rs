use std::time::Duration;

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use rand::Rng;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::api_key::VaultClient;
use crate::extractors::json::AppJson;
use crate::models::vault::*;
use crate::state::AppState;
use crate::utils::payment::random_token;
use crate::utils::vault::{
    DECRYPTED_CARD, HIGH_VALUE_LIMIT, VAULT_ALGORITHM, VAULT_KEY_ID, default_card,
};

/// Vault round trip, in milliseconds.
const VAULT_LATENCY_MS: std::ops::Range<u64> = 50..150;

async fn vault_round_trip(state: &AppState) {
    if state.config.vault.simulate_latency {
        let delay = rand::rng().random_range(VAULT_LATENCY_MS);
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
}

#[utoipa::path(
    post,
    path = "/retrieve",
    tag = "Payment Vault",
    operation_id = "retrievePaymentMethod",
    summary = "Fetch the caller's default card, encrypted",
    request_body = RetrieveRequest,
    responses(
        (status = 200, description = "Encrypted default card", body = RetrieveResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Missing or wrong API key (UNAUTHORIZED)", body = ErrorBody),
        (status = 403, description = "Other user's vault or high-value transaction (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "No stored cards (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "Default card expired (UNPROCESSABLE)", body = ErrorBody),
    ),
    security(("api_key" = [])),
)]
#[instrument(skip(state, client, payload), fields(user_id = client.user_id))]
pub async fn retrieve(
    client: VaultClient,
    State(state): State<AppState>,
    AppJson(payload): AppJson<RetrieveRequest>,
) -> Result<Json<RetrieveResponse>, AppError> {
    let request = validate_retrieve(&payload, client.user_id)?;
    vault_round_trip(&state).await;

    let card = default_card(request.user_id)
        .ok_or_else(|| AppError::NotFound("No payment methods found".into()))?;

    let now = Utc::now();
    if card.is_expired(now) {
        tracing::info!(payment_method = card.id, "Default card expired");
        return Err(AppError::Unprocessable("Payment method expired".into()));
    }
    if request.amount > HIGH_VALUE_LIMIT {
        tracing::info!(amount = request.amount, "High-value transaction needs verification");
        return Err(AppError::Forbidden(
            "Transaction requires additional verification".into(),
        ));
    }

    tracing::debug!(
        payment_method = card.id,
        item_count = request.item_count,
        "Retrieved payment method"
    );
    Ok(Json(RetrieveResponse {
        success: true,
        payment_method: card.into(),
        decryption_required: true,
        vault_metadata: VaultMetadata::at(now),
    }))
}

#[utoipa::path(
    post,
    path = "/store",
    tag = "Payment Vault",
    operation_id = "storePaymentMethod",
    summary = "Store a card in the vault",
    request_body = StoreRequest,
    responses(
        (status = 200, description = "Card stored", body = StoreResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Missing or wrong API key (UNAUTHORIZED)", body = ErrorBody),
    ),
    security(("api_key" = [])),
)]
#[instrument(skip(state, client, payload), fields(user_id = client.user_id))]
pub async fn store(
    client: VaultClient,
    State(state): State<AppState>,
    AppJson(payload): AppJson<StoreRequest>,
) -> Result<Json<StoreResponse>, AppError> {
    validate_store(&payload)?;
    vault_round_trip(&state).await;

    let payment_method_id = format!("pm_{}", random_token(10));
    tracing::info!(%payment_method_id, "Payment method stored");

    Ok(Json(StoreResponse {
        success: true,
        payment_method_id,
        message: "Payment method securely stored in vault",
    }))
}

#[utoipa::path(
    post,
    path = "/decrypt",
    tag = "Payment Vault",
    operation_id = "decryptPaymentMethod",
    summary = "Decrypt a vault payload",
    request_body = DecryptRequest,
    responses(
        (status = 200, description = "Decrypted card", body = DecryptResponse),
        (status = 400, description = "Missing or unsupported parameters (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Missing or wrong API key (UNAUTHORIZED)", body = ErrorBody),
    ),
    security(("api_key" = [])),
)]
#[instrument(skip(state, client, payload), fields(user_id = client.user_id))]
pub async fn decrypt(
    client: VaultClient,
    State(state): State<AppState>,
    AppJson(payload): AppJson<DecryptRequest>,
) -> Result<Json<DecryptResponse>, AppError> {
    validate_decrypt(&payload)?;
    vault_round_trip(&state).await;

    Ok(Json(DecryptResponse {
        success: true,
        decrypted_payment: (&DECRYPTED_CARD).into(),
        metadata: DecryptMetadata {
            decrypted_at: Utc::now(),
            key_id: VAULT_KEY_ID,
            algorithm: VAULT_ALGORITHM,
        },
    }))
}
