use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::utils::vault::{
    DecryptedCard, ENCRYPTED_CARD_DATA, StoredCard, VAULT_ALGORITHM, VAULT_KEY_ID, VAULT_VERSION,
};

const CARD_NUMBER_LEN: std::ops::RangeInclusive<usize> = 13..=19;

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionContext {
    #[schema(example = 199.99)]
    pub amount: Option<f64>,
    #[schema(example = 2)]
    pub item_count: Option<i64>,
}

/// Request body for fetching the caller's default card.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveRequest {
    #[schema(example = 211)]
    pub user_id: Option<i32>,
    pub transaction_context: Option<TransactionContext>,
}

/// A retrieve request that passed validation.
#[derive(Debug, PartialEq)]
pub struct ValidRetrieve {
    pub user_id: i32,
    pub amount: f64,
    pub item_count: i64,
}

/// Validate a retrieve request made with the key of `client_user_id`.
pub fn validate_retrieve(
    payload: &RetrieveRequest,
    client_user_id: i32,
) -> Result<ValidRetrieve, AppError> {
    let (Some(user_id), Some(context)) = (payload.user_id, payload.transaction_context.as_ref())
    else {
        return Err(AppError::Validation(
            "userId and transactionContext are required".into(),
        ));
    };
    if user_id != client_user_id {
        return Err(AppError::Forbidden("Access denied".into()));
    }

    let amount = context
        .amount
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or_else(|| AppError::Validation("Invalid transaction amount".into()))?;
    let item_count = context
        .item_count
        .filter(|c| *c >= 0)
        .ok_or_else(|| AppError::Validation("Invalid item count".into()))?;

    Ok(ValidRetrieve {
        user_id,
        amount,
        item_count,
    })
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedPaymentMethod {
    #[schema(example = "pm_1234567890")]
    pub id: String,
    #[schema(example = "visa")]
    pub card_type: String,
    #[schema(example = "9012")]
    pub last4: String,
    #[schema(example = "**12/27")]
    pub expiry_hint: String,
    pub is_default: bool,
    pub last_used: String,
    #[schema(example = "enc_4f8b2c1a9e3d7f2b8c4e6a1d3f5g7h9j")]
    pub encrypted_data: String,
    #[schema(example = "key_vault_2024_09_10")]
    pub key_id: String,
    #[schema(example = "AES-256-GCM")]
    pub algorithm: String,
}

impl From<&StoredCard> for EncryptedPaymentMethod {
    fn from(card: &StoredCard) -> Self {
        let digits = card.card_number;
        Self {
            id: card.id.into(),
            card_type: card.card_type.into(),
            last4: digits[digits.len().saturating_sub(4)..].into(),
            expiry_hint: card.expiry_hint(),
            is_default: card.is_default,
            last_used: card.last_used.into(),
            encrypted_data: ENCRYPTED_CARD_DATA.into(),
            key_id: VAULT_KEY_ID.into(),
            algorithm: VAULT_ALGORITHM.into(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaultMetadata {
    pub retrieved_at: DateTime<Utc>,
    #[schema(example = "2.1.0")]
    pub vault_version: &'static str,
    #[schema(example = "active")]
    pub encryption_status: &'static str,
}

impl VaultMetadata {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            retrieved_at: now,
            vault_version: VAULT_VERSION,
            encryption_status: "active",
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveResponse {
    pub success: bool,
    pub payment_method: EncryptedPaymentMethod,
    pub decryption_required: bool,
    pub vault_metadata: VaultMetadata,
}

/// Request body for storing a new card.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreRequest {
    #[schema(example = "4532123456789012")]
    pub card_number: Option<String>,
    #[schema(example = 12)]
    pub expiry_month: Option<u32>,
    #[schema(example = 2027)]
    pub expiry_year: Option<i32>,
    #[schema(example = "123")]
    pub cvv: Option<String>,
    #[schema(example = "John Doe")]
    pub cardholder_name: Option<String>,
}

pub fn validate_store(payload: &StoreRequest) -> Result<(), AppError> {
    let present = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.trim().is_empty());
    if !present(&payload.card_number)
        || payload.expiry_month.is_none()
        || payload.expiry_year.is_none()
        || !present(&payload.cvv)
        || !present(&payload.cardholder_name)
    {
        return Err(AppError::Validation("Incomplete payment details".into()));
    }

    let card_len = payload.card_number.as_deref().map_or(0, str::len);
    if !CARD_NUMBER_LEN.contains(&card_len) {
        return Err(AppError::Validation("Invalid card number format".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreResponse {
    pub success: bool,
    #[schema(example = "pm_k3j9x0a2b7")]
    pub payment_method_id: String,
    #[schema(example = "Payment method securely stored in vault")]
    pub message: &'static str,
}

/// Request body for decrypting a vault payload.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest {
    #[schema(example = "enc_4f8b2c1a9e3d7f2b8c4e6a1d3f5g7h9j")]
    pub encrypted_data: Option<String>,
    #[schema(example = "key_vault_2024_09_10")]
    pub key_id: Option<String>,
    #[schema(example = "AES-256-GCM")]
    pub algorithm: Option<String>,
}

pub fn validate_decrypt(payload: &DecryptRequest) -> Result<(), AppError> {
    let (Some(_), Some(key_id), Some(algorithm)) = (
        payload.encrypted_data.as_deref().filter(|s| !s.is_empty()),
        payload.key_id.as_deref(),
        payload.algorithm.as_deref(),
    ) else {
        return Err(AppError::Validation("Missing decryption parameters".into()));
    };
    if key_id != VAULT_KEY_ID || algorithm != VAULT_ALGORITHM {
        return Err(AppError::Validation("Invalid decryption parameters".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecryptedPayment {
    pub card_number: &'static str,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub security_code: &'static str,
    pub card_holder_name: &'static str,
    pub billing_zip_code: &'static str,
    pub issuing_bank: &'static str,
}

impl From<&DecryptedCard> for DecryptedPayment {
    fn from(card: &DecryptedCard) -> Self {
        Self {
            card_number: card.card_number,
            expiry_month: card.expiry_month,
            expiry_year: card.expiry_year,
            security_code: card.security_code,
            card_holder_name: card.card_holder_name,
            billing_zip_code: card.billing_zip_code,
            issuing_bank: card.issuing_bank,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecryptMetadata {
    pub decrypted_at: DateTime<Utc>,
    pub key_id: &'static str,
    pub algorithm: &'static str,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecryptResponse {
    pub success: bool,
    pub decrypted_payment: DecryptedPayment,
    pub metadata: DecryptMetadata,
}
