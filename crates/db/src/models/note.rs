//! Note entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::reference;
use taskboard_core::types::{DbId, Timestamp};

/// A note row from the `notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: DbId,
    #[serde(rename = "user")]
    pub user_id: DbId,
    #[serde(rename = "card")]
    pub card_id: Option<DbId>,
    #[serde(rename = "project")]
    pub project_id: Option<DbId>,
    pub title: Option<String>,
    pub content: String,
    pub label: Option<String>,
    pub colour: Option<String>,
    pub date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new note.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNote {
    pub content: String,
    pub title: Option<String>,
    pub label: Option<String>,
    pub colour: Option<String>,
    #[serde(default, deserialize_with = "reference::optional_ref")]
    pub card: Option<DbId>,
    #[serde(default, deserialize_with = "reference::optional_ref")]
    pub project: Option<DbId>,
}

/// DTO for updating a note.
///
/// `title`, `label` and `colour` clear on `null`; `card` and `project` are
/// tri-state references.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNote {
    pub content: Option<String>,
    #[serde(default, deserialize_with = "reference::nullable")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "reference::nullable")]
    pub label: Option<Option<String>>,
    #[serde(default, deserialize_with = "reference::nullable")]
    pub colour: Option<Option<String>>,
    #[serde(default, deserialize_with = "reference::nullable_ref")]
    pub card: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "reference::nullable_ref")]
    pub project: Option<Option<DbId>>,
}
