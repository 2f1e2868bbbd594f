//! Handlers for the `/cards` resource and the per-user timer.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use taskboard_core::error::CoreError;
use taskboard_core::text;
use taskboard_core::time_report::check_estimate;
use taskboard_core::types::DbId;
use taskboard_db::models::card::{Card, CardResponse, CreateCard, NewTimeEntry, UpdateCard};
use taskboard_db::repositories::CardRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{IdPath, JsonBody};
use crate::handlers::references::{check_list, check_project};
use crate::middleware::auth::{ensure_owner, AuthUser};
use crate::response::{NoTimer, Updated};
use crate::state::AppState;

/// Load a card and check that the caller owns it.
async fn owned_card(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Card> {
    let card = CardRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Card", id }))?;
    ensure_owner(auth, card.user_id, "only the owner can access the card")?;
    Ok(card)
}

/// Attach the logged intervals and note ids to a card.
async fn card_response(state: &AppState, card: Card) -> AppResult<CardResponse> {
    let time_spent = CardRepo::time_entries(&state.pool, card.id).await?;
    let notes = CardRepo::note_ids(&state.pool, card.id).await?;
    Ok(CardResponse {
        card,
        time_spent,
        notes,
    })
}

/// Reject intervals that end before they start.
fn validate_intervals(entries: &[NewTimeEntry]) -> AppResult<()> {
    if entries.iter().any(|e| e.stop < e.start) {
        return Err(AppError::BadRequest(
            "time interval stop must not be before its start".into(),
        ));
    }
    Ok(())
}

/// GET /api/cards
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CardResponse>>> {
    let cards = CardRepo::list_by_user(&state.pool, auth.user_id).await?;
    let ids: Vec<DbId> = cards.iter().map(|c| c.id).collect();

    let mut entries: HashMap<DbId, Vec<_>> = HashMap::new();
    for entry in CardRepo::time_entries_for_cards(&state.pool, &ids).await? {
        entries.entry(entry.card_id).or_default().push(entry);
    }
    let mut notes: HashMap<DbId, Vec<DbId>> = HashMap::new();
    for (card_id, note_id) in CardRepo::note_ids_for_cards(&state.pool, &ids).await? {
        notes.entry(card_id).or_default().push(note_id);
    }

    let cards = cards
        .into_iter()
        .map(|card| CardResponse {
            time_spent: entries.remove(&card.id).unwrap_or_default(),
            notes: notes.remove(&card.id).unwrap_or_default(),
            card,
        })
        .collect();
    Ok(Json(cards))
}

/// POST /api/cards
///
/// Appends the new card to the end of `list`. Both `list` and the optional
/// `project` must belong to the caller.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateCard>,
) -> AppResult<(StatusCode, Json<CardResponse>)> {
    let title = text::require(&input.title, "title")?;
    check_estimate(input.estimated_hours)?;
    check_list(&state, &auth, input.list).await?;
    if let Some(project_id) = input.project {
        check_project(&state, &auth, project_id).await?;
    }

    let input = CreateCard {
        title,
        description: text::optional(input.description.as_deref()),
        ..input
    };
    let card = CardRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        card_id = card.id,
        list_id = card.list_id,
        "Card created",
    );

    let response = card_response(&state, card).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/cards/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
) -> AppResult<Json<CardResponse>> {
    let card = owned_card(&state, &auth, id).await?;
    Ok(Json(card_response(&state, card).await?))
}

/// PUT /api/cards/{id}
///
/// Merges the supplied fields over the card. An absent or blank `title`
/// changes nothing and yields 304. A different `list` moves the card to the
/// end of that list; `project` reassigns it, and `""` or `null` detaches it.
/// `timeSpent` replaces the whole interval log.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
    JsonBody(input): JsonBody<UpdateCard>,
) -> AppResult<Updated<CardResponse>> {
    let card = owned_card(&state, &auth, id).await?;

    let title = text::optional(input.title.as_deref());
    if title.is_none() {
        return Ok(Updated::NotModified);
    }
    check_estimate(input.estimated_hours.flatten())?;

    if let Some(list_id) = input.list.filter(|&to| to != card.list_id) {
        check_list(&state, &auth, list_id).await?;
    }
    if let Some(Some(project_id)) = input.project.filter(|&to| to != card.project_id) {
        check_project(&state, &auth, project_id).await?;
    }
    if let Some(entries) = &input.time_spent {
        validate_intervals(entries)?;
    }

    let input = UpdateCard {
        title,
        description: input
            .description
            .map(|description| text::optional(description.as_deref())),
        ..input
    };
    let updated = CardRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Card", id }))?;

    if updated.list_id != card.list_id {
        tracing::info!(
            user_id = auth.user_id,
            card_id = id,
            from_list = card.list_id,
            to_list = updated.list_id,
            "Card moved",
        );
    } else {
        tracing::info!(user_id = auth.user_id, card_id = id, "Card updated");
    }

    Ok(Updated::Changed(card_response(&state, updated).await?))
}

/// DELETE /api/cards/{id}
///
/// The card leaves its list and project; attached notes survive detached.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
) -> AppResult<StatusCode> {
    owned_card(&state, &auth, id).await?;

    if !CardRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Card", id }));
    }

    tracing::info!(user_id = auth.user_id, card_id = id, "Card deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/cards/timer
///
/// The caller's ticking card, or `{"noTimerOn": true}`.
pub async fn current_timer(auth: AuthUser, State(state): State<AppState>) -> AppResult<Response> {
    match CardRepo::find_ticking_for_user(&state.pool, auth.user_id).await? {
        Some(card) => Ok(Json(card_response(&state, card).await?).into_response()),
        None => Ok(Json(NoTimer::default()).into_response()),
    }
}

/// POST /api/cards/{id}/timer/start
///
/// Any other running timer of the caller is stopped and logged first.
pub async fn start_timer(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
) -> AppResult<Json<CardResponse>> {
    owned_card(&state, &auth, id).await?;

    let card = CardRepo::start_timer(&state.pool, auth.user_id, id, Utc::now())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Card", id }))?;

    tracing::info!(user_id = auth.user_id, card_id = id, "Timer started");
    Ok(Json(card_response(&state, card).await?))
}

/// POST /api/cards/{id}/timer/stop
///
/// Stopping a card that is not ticking returns it unchanged.
pub async fn stop_timer(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
) -> AppResult<Json<CardResponse>> {
    owned_card(&state, &auth, id).await?;

    let stopped = CardRepo::stop_timer(&state.pool, id, Utc::now())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Card", id }))?;

    match &stopped.entry {
        Some(entry) => tracing::info!(
            user_id = auth.user_id,
            card_id = id,
            minutes = entry.interval().minutes(),
            "Timer stopped",
        ),
        None => tracing::debug!(card_id = id, "Stop requested on a card without a timer"),
    }

    Ok(Json(card_response(&state, stopped.card).await?))
}
