//! Route definitions for the `/cards` resource, including the timer.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::cards;
use crate::state::AppState;

/// Routes mounted at `/cards`.
///
/// ```text
/// GET    /                   -> list
/// POST   /                   -> create
/// GET    /timer              -> current_timer
/// GET    /{id}               -> get_by_id
/// PUT    /{id}               -> update
/// DELETE /{id}               -> delete
/// POST   /{id}/timer/start   -> start_timer
/// POST   /{id}/timer/stop    -> stop_timer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cards::list).post(cards::create))
        .route("/timer", get(cards::current_timer))
        .route(
            "/{id}",
            get(cards::get_by_id)
                .put(cards::update)
                .delete(cards::delete),
        )
        .route("/{id}/timer/start", post(cards::start_timer))
        .route("/{id}/timer/stop", post(cards::stop_timer))
}
