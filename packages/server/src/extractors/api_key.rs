use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;

/// Caller of the payment vault, authenticated by the `X-API-Key` header.
///
/// The configured key stands in for a single vault customer.
pub struct VaultClient {
    pub user_id: i32,
}

impl FromRequestParts<AppState> for VaultClient {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key = parts
            .headers
            .get("X-API-Key")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("API key required".into()))?;

        match state.config.vault.api_key.as_deref() {
            Some(valid) if valid == api_key => Ok(VaultClient {
                user_id: state.config.vault.user_id,
            }),
            _ => Err(AppError::Unauthorized("Invalid API key".into())),
        }
    }
}
