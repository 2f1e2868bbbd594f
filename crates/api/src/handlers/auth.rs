//! Handler for `POST /login`.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskboard_db::models::user::User;
use taskboard_db::repositories::UserRepo;

use crate::auth::jwt::generate_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::state::AppState;

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response, returned by login and registration.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
    pub name: String,
}

impl AuthResponse {
    /// Issue a fresh token for `user`.
    pub fn issue(state: &AppState, user: &User) -> AppResult<Self> {
        let token = generate_token(user.id, &user.username, &state.config.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

        Ok(Self {
            token,
            username: user.username.clone(),
            name: user.name(),
        })
    }
}

/// POST /api/login
///
/// Authenticate with username + password. Unknown users and wrong passwords
/// get the same 401.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(|| AppError::unauthorized("invalid username or password"))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::info!(username = %user.username, "Rejected login with wrong password");
        return Err(AppError::unauthorized("invalid username or password"));
    }

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");
    Ok(Json(AuthResponse::issue(&state, &user)?))
}
