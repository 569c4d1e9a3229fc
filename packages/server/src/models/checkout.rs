use common::PaymentMethod;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::utils::payment::ChargeItem;

/// Request body for the mock checkout.
#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Cart lines, each `{id | productId, quantity}`.
    #[schema(value_type = Vec<Object>)]
    pub items: Option<Value>,
    #[schema(value_type = Option<String>, example = "199.99")]
    pub total: Option<Decimal>,
    /// One of `card`, `paypal`, `apple_pay`, `google_pay`. Defaults to `card`.
    pub payment_method: Option<String>,
    pub payment_details: Option<PaymentDetails>,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub card_number: Option<String>,
    pub expiry_month: Option<i32>,
    pub expiry_year: Option<i32>,
    pub cvv: Option<String>,
    pub cardholder_name: Option<String>,
}

#[derive(Deserialize, Serialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

/// Approved checkout.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CheckoutResponse {
    pub success: bool,
    #[schema(example = "test_txn_k3j9x0a2b")]
    pub transaction_id: String,
    #[schema(example = "/receipts/test_p0q8r1s2t")]
    pub receipt_url: String,
}

/// Payload accepted by [`validate_checkout`].
pub struct ValidCheckout {
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub items: Vec<ChargeItem>,
}

fn invalid(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}

fn non_blank(s: &Option<String>) -> bool {
    s.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Either a non-empty string or a non-zero number identifies an item.
fn item_id(item: &Value) -> Option<String> {
    let raw = item.get("id").or_else(|| item.get("productId"))?;
    match raw {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Validate the checkout payload.
///
/// The shape check runs first and reports a single generic message; the
/// field checks after it report what exactly is wrong.
pub fn validate_checkout(payload: &CheckoutRequest) -> Result<ValidCheckout, AppError> {
    let (Some(Value::Array(items)), Some(total)) = (&payload.items, payload.total) else {
        return Err(invalid("Invalid checkout payload"));
    };
    if total.is_zero() {
        return Err(invalid("Invalid checkout payload"));
    }

    if items.is_empty() {
        return Err(invalid("Items are required for checkout"));
    }
    if total <= Decimal::ZERO {
        return Err(invalid("Valid total amount is required"));
    }

    let payment_method = match payload.payment_method.as_deref() {
        None | Some("") => PaymentMethod::Card,
        Some(method) => method.parse().map_err(invalid)?,
    };

    if payment_method == PaymentMethod::Card {
        let details = payload
            .payment_details
            .as_ref()
            .ok_or_else(|| invalid("Payment details are required for card payments"))?;

        if details.card_number.as_deref().is_none_or(|n| n.len() < 13) {
            return Err(invalid("Invalid card number format"));
        }
        if details.cvv.as_deref().is_none_or(|c| c.len() < 3) {
            return Err(invalid("Invalid security code format"));
        }
        if !non_blank(&details.cardholder_name) {
            return Err(invalid("Cardholder name is required"));
        }
        if details.expiry_month.is_none_or(|m| !(1..=12).contains(&m)) {
            return Err(invalid("Invalid expiry date"));
        }
    }

    if let Some(shipping) = &payload.shipping_address
        && !non_blank(&shipping.zip_code)
    {
        return Err(invalid("Shipping address must include zip code"));
    }

    let items = items
        .iter()
        .map(|item| {
            let quantity = item.get("quantity").and_then(Value::as_i64).unwrap_or(0);
            match item_id(item) {
                Some(id) if quantity > 0 => Ok(ChargeItem { id, quantity }),
                _ => Err(invalid("All items must have valid ID and quantity")),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidCheckout {
        total,
        payment_method,
        items,
    })
}
