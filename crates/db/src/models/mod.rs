//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) merged over the stored row
//!
//! Wire names are camelCase; owner and parent ids serialize under the entity
//! name (`user`, `list`, `project`, `card`).

pub mod card;
pub mod list;
pub mod note;
pub mod project;
pub mod user;
