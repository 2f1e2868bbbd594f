//! Handlers for the `/lists` resource.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::error::CoreError;
use taskboard_core::text;
use taskboard_core::types::DbId;
use taskboard_db::models::list::{CreateList, List, ListResponse, UpdateList};
use taskboard_db::repositories::ListRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{IdPath, JsonBody};
use crate::middleware::auth::{ensure_owner, AuthUser};
use crate::response::Updated;
use crate::state::AppState;

/// Load a list and check that the caller owns it.
async fn owned_list(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<List> {
    let list = ListRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "List", id }))?;
    ensure_owner(auth, list.user_id, "only the owner can access the list")?;
    Ok(list)
}

/// GET /api/lists
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ListResponse>>> {
    let lists = ListRepo::list_by_user(&state.pool, auth.user_id).await?;

    let ids: Vec<DbId> = lists.iter().map(|l| l.id).collect();
    let mut cards: HashMap<DbId, Vec<DbId>> = HashMap::new();
    for (list_id, card_id) in ListRepo::card_ids_for_lists(&state.pool, &ids).await? {
        cards.entry(list_id).or_default().push(card_id);
    }

    let lists = lists
        .into_iter()
        .map(|list| {
            let cards = cards.remove(&list.id).unwrap_or_default();
            ListResponse { list, cards }
        })
        .collect();
    Ok(Json(lists))
}

/// POST /api/lists
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateList>,
) -> AppResult<(StatusCode, Json<ListResponse>)> {
    let title = text::require(&input.title, "title")?;
    let list = ListRepo::create(&state.pool, auth.user_id, &title).await?;

    tracing::info!(user_id = auth.user_id, list_id = list.id, "List created");

    Ok((
        StatusCode::CREATED,
        Json(ListResponse {
            list,
            cards: Vec::new(),
        }),
    ))
}

/// GET /api/lists/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
) -> AppResult<Json<ListResponse>> {
    let list = owned_list(&state, &auth, id).await?;
    let cards = ListRepo::card_ids(&state.pool, id).await?;
    Ok(Json(ListResponse { list, cards }))
}

/// PUT /api/lists/{id}
///
/// Renames the list and, when `cards` is given, reorders its cards. `cards`
/// must hold exactly the list's current card ids. An absent or blank title
/// changes nothing and yields 304.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
    JsonBody(input): JsonBody<UpdateList>,
) -> AppResult<Updated<ListResponse>> {
    owned_list(&state, &auth, id).await?;

    let title = text::optional(input.title.as_deref());
    if title.is_none() {
        return Ok(Updated::NotModified);
    }

    if let Some(order) = &input.cards {
        let current = ListRepo::card_ids(&state.pool, id).await?;
        if !is_permutation(order, &current) {
            return Err(AppError::BadRequest(
                "cards must list exactly the cards of the list".into(),
            ));
        }
    }

    let list = ListRepo::update(&state.pool, id, title.as_deref(), input.cards.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "List", id }))?;
    let cards = ListRepo::card_ids(&state.pool, id).await?;

    tracing::info!(
        user_id = auth.user_id,
        list_id = id,
        reordered = input.cards.is_some(),
        "List updated",
    );

    Ok(Updated::Changed(ListResponse { list, cards }))
}

/// DELETE /api/lists/{id}
///
/// Only an empty list can be deleted.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
) -> AppResult<StatusCode> {
    owned_list(&state, &auth, id).await?;

    if !ListRepo::delete_if_empty(&state.pool, id).await? {
        return Err(AppError::BadRequest(
            "list still has cards; move or delete them first".into(),
        ));
    }

    tracing::info!(user_id = auth.user_id, list_id = id, "List deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Whether `order` holds each id of `current` exactly once.
fn is_permutation(order: &[DbId], current: &[DbId]) -> bool {
    let mut a = order.to_vec();
    let mut b = current.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutation_check() {
        assert!(is_permutation(&[3, 1, 2], &[1, 2, 3]));
        assert!(is_permutation(&[], &[]));
        assert!(!is_permutation(&[1, 2], &[1, 2, 3]));
        assert!(!is_permutation(&[1, 1, 2], &[1, 2, 3]));
        assert!(!is_permutation(&[1, 2, 4], &[1, 2, 3]));
    }
}
