//! Handlers for the `/users` resource (registration and listing).

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskboard_core::error::CoreError;
use taskboard_core::text;
use taskboard_core::types::DbId;
use taskboard_db::models::user::{CreateUser, UserResponse};
use taskboard_db::repositories::{ListRepo, UserRepo};

use crate::auth::password::{hash_password, validate_password_length};
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::handlers::auth::AuthResponse;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /users`.
///
/// Every field is optional at the JSON level so that a missing username or
/// password yields a readable validation message instead of a parse error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: Option<String>,
}

/// POST /api/users
///
/// Register a new account and log it in straight away.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let username = text::optional(input.username.as_deref())
        .ok_or_else(|| CoreError::Validation("username is required".into()))?;
    let password = input
        .password
        .ok_or_else(|| CoreError::Validation("password is required".into()))?;
    validate_password_length(&password).map_err(CoreError::Validation)?;

    if UserRepo::find_by_username(&state.pool, &username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(format!(
            "username '{username}' is already taken"
        )));
    }

    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(AuthResponse::issue(&state, &user)?)))
}

/// GET /api/users
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;

    let mut lists: HashMap<DbId, Vec<DbId>> = HashMap::new();
    for (user_id, list_id) in ListRepo::owner_pairs(&state.pool).await? {
        lists.entry(user_id).or_default().push(list_id);
    }

    let users = users
        .into_iter()
        .map(|user| {
            let owned = lists.remove(&user.id).unwrap_or_default();
            UserResponse::new(user, owned)
        })
        .collect();
    Ok(Json(users))
}
