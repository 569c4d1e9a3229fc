use std::time::Duration;

use axum::Json;
use axum::extract::State;
use rand::Rng;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::checkout::*;
use crate::state::AppState;
use crate::utils::payment::{ChargeOutcome, ChargeRequest, MockGateway};

/// Gateway round trip, in milliseconds.
const GATEWAY_LATENCY_MS: std::ops::Range<u64> = 200..700;

#[utoipa::path(
    post,
    path = "/borkedpay",
    tag = "Checkout",
    operation_id = "checkoutBorkedpay",
    summary = "Pay for a cart with the mock gateway",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Payment approved", body = CheckoutResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING)", body = ErrorBody),
        (status = 402, description = "Payment declined, `code` is the decline code", body = ErrorBody),
        (status = 403, description = "Bad token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn borkedpay(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let checkout = validate_checkout(&payload)?;

    let request = ChargeRequest {
        amount: checkout.total,
        currency: "USD",
        customer_id: auth_user.user_id,
        payment_method: checkout.payment_method.as_str().to_string(),
        items: checkout.items,
    };

    if state.config.checkout.simulate_latency {
        let delay = rand::rng().random_range(GATEWAY_LATENCY_MS);
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let gateway = MockGateway::from_config(&state.config.checkout);
    match gateway.charge(&request) {
        ChargeOutcome::Approved {
            transaction_id,
            receipt_url,
        } => {
            tracing::info!(
                %transaction_id,
                amount = %request.amount,
                method = %request.payment_method,
                "Payment approved"
            );
            Ok(Json(CheckoutResponse {
                success: true,
                transaction_id,
                receipt_url,
            }))
        }
        ChargeOutcome::Declined(code) => {
            tracing::warn!(%code, amount = %request.amount, "Payment declined");
            Err(AppError::PaymentDeclined(code))
        }
    }
}
