use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::purchase;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::purchase::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Purchases",
    operation_id = "createPurchase",
    summary = "Record a purchase",
    request_body = CreatePurchaseRequest,
    responses(
        (status = 201, description = "Purchase recorded", body = CreatePurchaseResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Bad token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_purchase(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePurchaseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (items, total) = validate_create_purchase(payload)?;
    let item_count = items.as_array().map_or(0, Vec::len);

    let model = purchase::ActiveModel {
        user_id: Set(auth_user.user_id),
        items: Set(items),
        total: Set(total),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(
        purchase_id = model.id,
        item_count,
        %total,
        "{} purchased {} items",
        auth_user.username,
        item_count
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatePurchaseResponse {
            message: "Purchase successful",
            purchase: model.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Purchases",
    operation_id = "listPurchases",
    summary = "List the caller's purchases, newest first",
    responses(
        (status = 200, description = "Purchase history", body = Vec<PurchaseResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Bad token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_purchases(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PurchaseResponse>>, AppError> {
    let purchases = purchase::Entity::find()
        .filter(purchase::Column::UserId.eq(auth_user.user_id))
        .order_by_desc(purchase::Column::CreatedAt)
        .order_by_desc(purchase::Column::Id)
        .all(&state.db)
        .await?;

    tracing::debug!(count = purchases.len(), "Fetched purchase history");
    Ok(Json(purchases.into_iter().map(Into::into).collect()))
}
