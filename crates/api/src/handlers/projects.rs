//! Handlers for the `/projects` resource, including the time report.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::error::CoreError;
use taskboard_core::text;
use taskboard_core::time_report::{build_report, check_estimate};
use taskboard_core::types::DbId;
use taskboard_db::models::project::{
    CreateProject, Project, ProjectReport, ProjectResponse, UpdateProject,
};
use taskboard_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{IdPath, JsonBody};
use crate::middleware::auth::{ensure_owner, AuthUser};
use crate::response::Updated;
use crate::state::AppState;

/// Load a project and check that the caller owns it.
async fn owned_project(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    ensure_owner(auth, project.user_id, "only the owner can access the project")?;
    Ok(project)
}

/// GET /api/projects
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProjectResponse>>> {
    let projects = ProjectRepo::list_by_user(&state.pool, auth.user_id).await?;

    let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();
    let mut cards: HashMap<DbId, Vec<DbId>> = HashMap::new();
    for (project_id, card_id) in ProjectRepo::card_ids_for_projects(&state.pool, &ids).await? {
        cards.entry(project_id).or_default().push(card_id);
    }

    let projects = projects
        .into_iter()
        .map(|project| {
            let cards = cards.remove(&project.id).unwrap_or_default();
            ProjectResponse { project, cards }
        })
        .collect();
    Ok(Json(projects))
}

/// POST /api/projects
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateProject>,
) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
    let title = text::require(&input.title, "title")?;
    check_estimate(input.estimated_hours)?;

    let input = CreateProject { title, ..input };
    let project = ProjectRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(user_id = auth.user_id, project_id = project.id, "Project created");

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse {
            project,
            cards: Vec::new(),
        }),
    ))
}

/// GET /api/projects/{id}
///
/// The project with its cards' logged time and the aggregated report.
pub async fn report(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
) -> AppResult<Json<ProjectReport>> {
    let project = owned_project(&state, &auth, id).await?;
    let cards = ProjectRepo::cards_with_time(&state.pool, id).await?;

    let intervals = cards
        .iter()
        .flat_map(|card| card.time_spent.iter().map(|entry| entry.interval()));
    let report = build_report(intervals, project.estimated_hours);

    Ok(Json(ProjectReport {
        project,
        cards,
        report,
    }))
}

/// PUT /api/projects/{id}
///
/// An absent or blank `title` changes nothing and yields 304. `dueDate` and
/// `estimatedHours` are cleared by `null`.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
    JsonBody(input): JsonBody<UpdateProject>,
) -> AppResult<Updated<ProjectResponse>> {
    owned_project(&state, &auth, id).await?;

    let title = text::optional(input.title.as_deref());
    if title.is_none() {
        return Ok(Updated::NotModified);
    }
    check_estimate(input.estimated_hours.flatten())?;

    let input = UpdateProject { title, ..input };
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    let cards = ProjectRepo::card_ids(&state.pool, id).await?;

    tracing::info!(user_id = auth.user_id, project_id = id, "Project updated");

    Ok(Updated::Changed(ProjectResponse { project, cards }))
}

/// DELETE /api/projects/{id}
///
/// Cards and notes of the project survive with their project cleared.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
) -> AppResult<StatusCode> {
    owned_project(&state, &auth, id).await?;

    let detached = ProjectRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    tracing::info!(
        user_id = auth.user_id,
        project_id = id,
        detached_cards = detached.cards,
        detached_notes = detached.notes,
        "Project deleted",
    );
    Ok(StatusCode::NO_CONTENT)
}
