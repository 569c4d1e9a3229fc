use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::purchase;
use crate::error::AppError;
use crate::models::shared::check_money;

/// Request body for recording a purchase.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePurchaseRequest {
    /// Purchased lines, stored as given.
    #[schema(value_type = Vec<Object>)]
    pub items: Option<Value>,
    #[schema(value_type = Option<String>, example = "59.98")]
    pub total: Option<Decimal>,
}

pub fn validate_create_purchase(
    payload: CreatePurchaseRequest,
) -> Result<(Value, Decimal), AppError> {
    match (payload.items, payload.total) {
        (Some(Value::Array(items)), Some(total)) if !items.is_empty() && total > Decimal::ZERO => {
            check_money("Total", total)?;
            Ok((Value::Array(items), total))
        }
        (Some(Value::Array(items)), Some(_)) if !items.is_empty() => Err(AppError::Validation(
            "Total must be a positive amount".into(),
        )),
        (Some(items), Some(_)) if !items.is_array() => Err(AppError::Validation(
            "Items must be an array".into(),
        )),
        _ => Err(AppError::Validation("Items and total are required".into())),
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = 42)]
    pub user_id: i32,
    #[schema(value_type = Vec<Object>)]
    pub items: Value,
    #[schema(value_type = String, example = "59.98")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<purchase::Model> for PurchaseResponse {
    fn from(m: purchase::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            items: m.items,
            total: m.total,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CreatePurchaseResponse {
    #[schema(example = "Purchase successful")]
    pub message: &'static str,
    pub purchase: PurchaseResponse,
}
