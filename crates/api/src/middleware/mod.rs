//! Request extractors that gate handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a bearer token.
//! - [`auth::ensure_owner`] -- Rejects access to another user's resource.

pub mod auth;
