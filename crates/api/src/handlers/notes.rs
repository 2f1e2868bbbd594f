//! Handlers for the `/notes` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::error::CoreError;
use taskboard_core::text;
use taskboard_core::types::DbId;
use taskboard_db::models::note::{CreateNote, Note, UpdateNote};
use taskboard_db::repositories::NoteRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{IdPath, JsonBody};
use crate::handlers::references::{check_card, check_project};
use crate::middleware::auth::{ensure_owner, AuthUser};
use crate::response::Updated;
use crate::state::AppState;

async fn owned_note(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
    message: &str,
) -> AppResult<Note> {
    let note = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;
    ensure_owner(auth, note.user_id, message)?;
    Ok(note)
}

/// GET /api/notes
pub async fn list(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Note>>> {
    let notes = NoteRepo::list_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(notes))
}

/// POST /api/notes
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateNote>,
) -> AppResult<(StatusCode, Json<Note>)> {
    let content = text::require(&input.content, "content")?;
    if let Some(card_id) = input.card {
        check_card(&state, &auth, card_id).await?;
    }
    if let Some(project_id) = input.project {
        check_project(&state, &auth, project_id).await?;
    }

    let input = CreateNote {
        content,
        title: text::optional(input.title.as_deref()),
        ..input
    };
    let note = NoteRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        note_id = note.id,
        card_id = note.card_id,
        "Note created",
    );

    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/notes/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
) -> AppResult<Json<Note>> {
    let note = owned_note(&state, &auth, id, "only the owner can view the note").await?;
    Ok(Json(note))
}

/// PUT /api/notes/{id}
///
/// An absent or blank `content` changes nothing and yields 304. `title`,
/// `label` and `colour` are cleared by `null`. `card` and `project`
/// accept an id to (re)attach, or `""`/`null` to detach.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
    JsonBody(input): JsonBody<UpdateNote>,
) -> AppResult<Updated<Note>> {
    let note = owned_note(&state, &auth, id, "only the owner can update the note").await?;

    let content = text::optional(input.content.as_deref());
    if content.is_none() {
        return Ok(Updated::NotModified);
    }

    if let Some(Some(card_id)) = input.card.filter(|&to| to != note.card_id) {
        check_card(&state, &auth, card_id).await?;
    }
    if let Some(Some(project_id)) = input.project.filter(|&to| to != note.project_id) {
        check_project(&state, &auth, project_id).await?;
    }

    let input = UpdateNote {
        content,
        title: input.title.map(|title| text::optional(title.as_deref())),
        ..input
    };
    let updated = NoteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;

    tracing::info!(
        user_id = auth.user_id,
        note_id = id,
        card_id = updated.card_id,
        "Note updated",
    );

    Ok(Updated::Changed(updated))
}

/// DELETE /api/notes/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
) -> AppResult<StatusCode> {
    owned_note(&state, &auth, id, "only the owner can delete the note").await?;

    if !NoteRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Note", id }));
    }

    tracing::info!(user_id = auth.user_id, note_id = id, "Note deleted");
    Ok(StatusCode::NO_CONTENT)
}
