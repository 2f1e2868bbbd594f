//! Validation of ids that a request body points at.
//!
//! A referenced list, project or card that is missing or belongs to someone
//! else is a 400 on the request, not a 404 on the addressed resource.

use taskboard_core::types::DbId;
use taskboard_db::repositories::{CardRepo, ListRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub async fn check_list(state: &AppState, auth: &AuthUser, list_id: DbId) -> AppResult<()> {
    match ListRepo::find_by_id(&state.pool, list_id).await? {
        Some(list) if list.user_id == auth.user_id => Ok(()),
        _ => Err(AppError::BadRequest("no such list".into())),
    }
}

pub async fn check_project(state: &AppState, auth: &AuthUser, project_id: DbId) -> AppResult<()> {
    match ProjectRepo::find_by_id(&state.pool, project_id).await? {
        Some(project) if project.user_id == auth.user_id => Ok(()),
        _ => Err(AppError::BadRequest("no such project".into())),
    }
}

pub async fn check_card(state: &AppState, auth: &AuthUser, card_id: DbId) -> AppResult<()> {
    match CardRepo::find_by_id(&state.pool, card_id).await? {
        Some(card) if card.user_id == auth.user_id => Ok(()),
        _ => Err(AppError::BadRequest("no such card".into())),
    }
}
