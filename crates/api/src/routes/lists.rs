//! Route definitions for the `/lists` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::lists;
use crate::state::AppState;

/// Routes mounted at `/lists`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lists::list).post(lists::create))
        .route(
            "/{id}",
            get(lists::get_by_id)
                .put(lists::update)
                .delete(lists::delete),
        )
}
