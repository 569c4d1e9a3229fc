use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::feature_flag;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::flag::*;
use crate::models::shared::MessageResponse;
use crate::state::AppState;
use crate::utils::notify::FlagActor;

async fn find_flag(db: &DatabaseConnection, name: &str) -> Result<feature_flag::Model, AppError> {
    feature_flag::Entity::find()
        .filter(feature_flag::Column::Name.eq(name))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Flag '{name}' not found")))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Flags",
    operation_id = "listFlags",
    summary = "Default value of every flag",
    responses(
        (status = 200, description = "Flag name to value", body = BTreeMap<String, bool>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_flags(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, bool>>, AppError> {
    let flags = feature_flag::Entity::find()
        .select_only()
        .columns([feature_flag::Column::Name, feature_flag::Column::Value])
        .into_tuple::<(String, bool)>()
        .all(&state.db)
        .await?;
    Ok(Json(flags.into_iter().collect()))
}

#[utoipa::path(
    get,
    path = "/descriptions",
    tag = "Flags",
    operation_id = "listFlagDescriptions",
    summary = "Name and description of every flag",
    responses(
        (status = 200, description = "Flag descriptions", body = Vec<FlagDescription>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_flag_descriptions(
    State(state): State<AppState>,
) -> Result<Json<Vec<FlagDescription>>, AppError> {
    let flags = feature_flag::Entity::find()
        .select_only()
        .columns([feature_flag::Column::Name, feature_flag::Column::Description])
        .order_by_asc(feature_flag::Column::Name)
        .into_tuple::<(String, Option<String>)>()
        .all(&state.db)
        .await?;

    Ok(Json(
        flags
            .into_iter()
            .map(|(name, description)| FlagDescription { name, description })
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/details",
    tag = "Flags",
    operation_id = "listFlagDetails",
    summary = "Every flag with its audit fields",
    responses(
        (status = 200, description = "Flag rows", body = Vec<FlagResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_flag_details(
    State(state): State<AppState>,
) -> Result<Json<Vec<FlagResponse>>, AppError> {
    let flags = feature_flag::Entity::find()
        .order_by_asc(feature_flag::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(flags.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Flags",
    operation_id = "createFlag",
    summary = "Create a flag",
    request_body = CreateFlagRequest,
    responses(
        (status = 201, description = "Flag created", body = FlagResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Flag already exists (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_flag(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateFlagRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = validate_create_flag(payload)?;
    let conflict = || AppError::Conflict(format!("Flag '{}' already exists", new.name));

    let existing = feature_flag::Entity::find()
        .filter(feature_flag::Column::Name.eq(&new.name))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(conflict());
    }

    let now = chrono::Utc::now();
    let model = feature_flag::ActiveModel {
        name: Set(new.name.clone()),
        value: Set(new.value),
        description: Set(Some(new.description.clone())),
        last_updated_by: Set(Some(state.config.flags.default_actor.clone())),
        last_updated_at: Set(now),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => conflict(),
        _ => AppError::from(e),
    })?;

    tracing::info!(flag = %model.name, value = model.value, "Flag created");
    Ok((StatusCode::CREATED, Json(FlagResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/defaults/{name}",
    tag = "Flags",
    operation_id = "updateFlagDefault",
    summary = "Change a flag's default value",
    description = "Records who changed it and sends a change notification. Setting the current value is a no-op.",
    params(("name" = String, Path, description = "Flag name")),
    request_body = UpdateFlagRequest,
    responses(
        (status = 200, description = "Flag updated or unchanged", body = UpdateFlagResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Flag not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(flag = %name))]
pub async fn update_flag_default(
    State(state): State<AppState>,
    Path(name): Path<String>,
    AppJson(payload): AppJson<UpdateFlagRequest>,
) -> Result<Json<UpdateFlagResponse>, AppError> {
    let value = payload.bool_value()?;
    let actor = payload.actor()?;
    let flag = find_flag(&state.db, &name).await?;

    if flag.value == value {
        return Ok(Json(UpdateFlagResponse::Unchanged(MessageResponse::new(
            "Flag value unchanged",
        ))));
    }

    let actor = actor.map_or_else(|| state.config.flags.default_actor.clone(), str::to_owned);

    let mut active: feature_flag::ActiveModel = flag.into();
    active.value = Set(value);
    active.last_updated_by = Set(Some(actor));
    active.last_updated_at = Set(chrono::Utc::now());
    active.update(&state.db).await?;

    tracing::info!(value, "Flag default changed");

    let notified = state
        .notifier
        .notify(
            &name,
            "updated",
            FlagActor {
                id: payload.user_id.as_deref(),
                kind: payload.user_type.as_deref(),
            },
        )
        .await;
    if let Err(e) = notified {
        tracing::warn!("Flag change notification failed: {}", e);
    }

    Ok(Json(UpdateFlagResponse::Updated(FlagUpdated { success: true })))
}

#[utoipa::path(
    delete,
    path = "/{name}",
    tag = "Flags",
    operation_id = "deleteFlag",
    summary = "Delete a flag",
    params(("name" = String, Path, description = "Flag name")),
    responses(
        (status = 204, description = "Flag deleted"),
        (status = 404, description = "Flag not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(flag = %name))]
pub async fn delete_flag(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    let flag = find_flag(&state.db, &name).await?;
    feature_flag::Entity::delete_by_id(flag.id)
        .exec(&state.db)
        .await?;

    tracing::info!("Flag deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/notify-flag-change",
    tag = "Flags",
    operation_id = "notifyFlagChange",
    summary = "Report a client-side flag override",
    request_body = NotifyFlagChangeRequest,
    responses(
        (status = 201, description = "Notification sent", body = MessageResponse),
        (status = 400, description = "Missing fields (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Notification failed (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn notify_flag_change(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NotifyFlagChangeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let change = validate_notify_request(&payload)?;

    state
        .notifier
        .notify(
            change.flag_name,
            change.action,
            FlagActor {
                id: Some(change.user_id),
                kind: Some(change.user_type),
            },
        )
        .await
        .map_err(|e| AppError::Internal(format!("Flag change notification failed: {}", e)))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Notification sent successfully")),
    ))
}
