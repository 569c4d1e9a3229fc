use axum::Json;
use axum::extract::State;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;

use crate::entity::user_cart;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::cart::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Cart",
    operation_id = "getCart",
    summary = "Get the caller's saved cart",
    responses(
        (status = 200, description = "Saved cart, empty when none", body = CartResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Bad token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_cart(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<CartResponse>, AppError> {
    let cart = user_cart::Entity::find()
        .filter(user_cart::Column::UserId.eq(auth_user.user_id))
        .one(&state.db)
        .await?;

    let cart_data = cart
        .map(|c| c.cart_data)
        .unwrap_or_else(|| serde_json::Value::Array(Vec::new()));
    Ok(Json(CartResponse { cart_data }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Cart",
    operation_id = "saveCart",
    summary = "Replace the caller's saved cart",
    description = "Upserts by user, so each user has at most one cart row.",
    request_body = SaveCartRequest,
    responses(
        (status = 200, description = "Cart saved", body = SaveCartResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Bad token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn save_cart(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SaveCartRequest>,
) -> Result<Json<SaveCartResponse>, AppError> {
    let cart_data = validate_save_cart(payload)?;

    let now = chrono::Utc::now();
    let model = user_cart::ActiveModel {
        user_id: Set(auth_user.user_id),
        cart_data: Set(cart_data),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let cart = user_cart::Entity::insert(model)
        .on_conflict(
            OnConflict::column(user_cart::Column::UserId)
                .update_columns([user_cart::Column::CartData, user_cart::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_with_returning(&state.db)
        .await?;

    tracing::debug!(cart_id = cart.id, "Cart saved");
    Ok(Json(SaveCartResponse {
        message: "Cart saved successfully",
        cart: cart.into(),
    }))
}
