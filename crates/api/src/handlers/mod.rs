//! Request handlers, one module per resource.
//!
//! Handlers verify ownership through [`crate::middleware::auth::ensure_owner`]
//! before touching a repository and log every mutation with `tracing`.

pub mod auth;
pub mod cards;
pub mod lists;
pub mod notes;
pub mod projects;
mod references;
pub mod users;
