use serde::{Deserialize, Serialize};

use crate::error::AppError;

const MAX_USERNAME_LEN: usize = 100;

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Unique username (1-100 characters after trimming).
    #[schema(example = "demo")]
    pub username: Option<String>,
    #[schema(example = "demo123")]
    pub password: Option<String>,
}

/// Credentials that passed validation.
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

fn required_credentials<'a>(
    username: &'a Option<String>,
    password: &'a Option<String>,
) -> Result<Credentials<'a>, AppError> {
    let username = username.as_deref().map(str::trim).unwrap_or_default();
    let password = password.as_deref().unwrap_or_default();
    if username.is_empty() || password.trim().is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }
    Ok(Credentials { username, password })
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<Credentials<'_>, AppError> {
    let creds = required_credentials(&payload.username, &payload.password)?;
    if creds.username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(creds)
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "demo")]
    pub username: Option<String>,
    #[schema(example = "demo123")]
    pub password: Option<String>,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<Credentials<'_>, AppError> {
    required_credentials(&payload.username, &payload.password)
}

/// Successful registration response.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[schema(example = "User registered successfully")]
    pub message: &'static str,
    /// ID of the newly created user.
    #[schema(example = 42)]
    pub user_id: i32,
}

/// Public part of a user account.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "demo")]
    pub username: String,
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// HS256 bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: UserInfo,
}

/// Claims of the presented token.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[schema(example = 42)]
    pub user_id: i32,
    #[schema(example = "demo")]
    pub username: String,
}
