pub mod auth;
pub mod cards;
pub mod health;
pub mod lists;
pub mod notes;
pub mod projects;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /login                         login (public)
///
/// /users                         register (public), list
///
/// /lists                         list, create
/// /lists/{id}                    get, update, delete
///
/// /cards                         list, create
/// /cards/timer                   caller's ticking card
/// /cards/{id}                    get, update, delete
/// /cards/{id}/timer/start        start timer (POST)
/// /cards/{id}/timer/stop         stop timer (POST)
///
/// /projects                      list, create
/// /projects/{id}                 report, update, delete
///
/// /notes                         list, create
/// /notes/{id}                    get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/users", users::router())
        .nest("/lists", lists::router())
        .nest("/cards", cards::router())
        .nest("/projects", projects::router())
        .nest("/notes", notes::router())
}
