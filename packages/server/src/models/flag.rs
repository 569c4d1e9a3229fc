use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::feature_flag;
use crate::error::AppError;
use crate::models::shared::{MessageResponse, check_len};

pub const FLAG_NAME_MAX_LEN: usize = 255;
/// Width of `last_updated_by`.
pub const ACTOR_MAX_LEN: usize = 255;

/// Request body for creating a flag. Fields are loosely typed so type errors
/// get a field-specific message.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateFlagRequest {
    #[schema(value_type = String, example = "DARK_MODE")]
    pub name: Option<Value>,
    /// Defaults to `false`.
    #[schema(value_type = Option<bool>, example = false)]
    pub value: Option<Value>,
    #[schema(value_type = Option<String>, example = "Dark colour scheme")]
    pub description: Option<Value>,
}

/// A flag ready to insert.
#[derive(Debug, PartialEq, Eq)]
pub struct NewFlag {
    pub name: String,
    pub value: bool,
    pub description: String,
}

pub fn validate_create_flag(payload: CreateFlagRequest) -> Result<NewFlag, AppError> {
    let name = match payload.name {
        Some(Value::String(name)) if !name.trim().is_empty() => name,
        _ => {
            return Err(AppError::Validation(
                "Flag name is required and must be a string".into(),
            ));
        }
    };
    check_len("Flag name", &name, FLAG_NAME_MAX_LEN)?;
    let value = match payload.value {
        None => false,
        Some(Value::Bool(value)) => value,
        Some(_) => return Err(AppError::Validation("Value must be a boolean".into())),
    };
    let description = match payload.description {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(description)) => description,
        Some(_) => {
            return Err(AppError::Validation("Description must be a string".into()));
        }
    };

    Ok(NewFlag {
        name,
        value,
        description,
    })
}

/// Request body for changing a flag's default value.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFlagRequest {
    #[schema(value_type = bool, example = true)]
    pub value: Option<Value>,
    /// Recorded as `last_updated_by` and sent with the change notification.
    #[schema(example = "alice@example.com")]
    pub user_id: Option<String>,
    #[schema(example = "email")]
    pub user_type: Option<String>,
}

impl UpdateFlagRequest {
    pub fn bool_value(&self) -> Result<bool, AppError> {
        match self.value {
            Some(Value::Bool(value)) => Ok(value),
            _ => Err(AppError::Validation("Value must be a boolean".into())),
        }
    }

    /// The actor to record, if one was given.
    pub fn actor(&self) -> Result<Option<&str>, AppError> {
        match self.user_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => {
                check_len("userId", id, ACTOR_MAX_LEN)?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }
}

/// Request body for reporting a client-side override change.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotifyFlagChangeRequest {
    #[schema(example = "DARK_MODE")]
    pub flag_name: Option<String>,
    #[schema(example = "updated")]
    pub action: Option<String>,
    #[schema(example = "alice@example.com")]
    pub user_id: Option<String>,
    #[schema(example = "email")]
    pub user_type: Option<String>,
}

/// Override notification with every field present.
pub struct FlagChange<'a> {
    pub flag_name: &'a str,
    pub action: &'a str,
    pub user_id: &'a str,
    pub user_type: &'a str,
}

pub fn validate_notify_request(
    payload: &NotifyFlagChangeRequest,
) -> Result<FlagChange<'_>, AppError> {
    fn field(f: &Option<String>) -> Option<&str> {
        f.as_deref().filter(|s| !s.is_empty())
    }

    match (
        field(&payload.flag_name),
        field(&payload.action),
        field(&payload.user_id),
        field(&payload.user_type),
    ) {
        (Some(flag_name), Some(action), Some(user_id), Some(user_type)) => Ok(FlagChange {
            flag_name,
            action,
            user_id,
            user_type,
        }),
        _ => Err(AppError::Validation(
            "Missing required fields for override notification".into(),
        )),
    }
}

/// Flag name and description, as listed in the admin menu.
#[derive(Serialize, utoipa::ToSchema)]
pub struct FlagDescription {
    #[schema(example = "DARK_MODE")]
    pub name: String,
    pub description: Option<String>,
}

/// A full flag row.
#[derive(Serialize, utoipa::ToSchema)]
pub struct FlagResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "DARK_MODE")]
    pub name: String,
    pub value: bool,
    pub description: Option<String>,
    #[schema(example = "admin-menu@hoopshop.app")]
    pub last_updated_by: Option<String>,
    pub last_updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<feature_flag::Model> for FlagResponse {
    fn from(m: feature_flag::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            value: m.value,
            description: m.description,
            last_updated_by: m.last_updated_by,
            last_updated_at: m.last_updated_at,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FlagUpdated {
    pub success: bool,
}

/// `{success: true}` after a change, `{message}` when the value was already set.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum UpdateFlagResponse {
    Unchanged(MessageResponse),
    Updated(FlagUpdated),
}
