use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::user_cart;
use crate::error::AppError;

/// Request body for saving the cart.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveCartRequest {
    /// Cart lines; replaces whatever was saved before.
    #[schema(value_type = Vec<Object>)]
    pub cart_data: Option<Value>,
}

pub fn validate_save_cart(payload: SaveCartRequest) -> Result<Value, AppError> {
    match payload.cart_data {
        None | Some(Value::Null) => Err(AppError::Validation("cartData is required".into())),
        Some(data @ Value::Array(_)) => Ok(data),
        Some(_) => Err(AppError::Validation("cartData must be an array".into())),
    }
}

/// The caller's saved cart, empty when nothing was saved yet.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    #[schema(value_type = Vec<Object>)]
    pub cart_data: Value,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartRow {
    pub id: i32,
    pub user_id: i32,
    #[schema(value_type = Vec<Object>)]
    pub cart_data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user_cart::Model> for CartRow {
    fn from(m: user_cart::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            cart_data: m.cart_data,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SaveCartResponse {
    #[schema(example = "Cart saved successfully")]
    pub message: &'static str,
    pub cart: CartRow,
}
