//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Operations that touch more
//! than one row to keep cross-entity references consistent run inside a
//! single transaction.

pub mod card_repo;
pub mod list_repo;
pub mod note_repo;
pub mod project_repo;
pub mod user_repo;

pub use card_repo::CardRepo;
pub use list_repo::ListRepo;
pub use note_repo::NoteRepo;
pub use project_repo::{DetachedCounts, ProjectRepo};
pub use user_repo::UserRepo;
