//! List entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::types::{DbId, Timestamp};

/// A list row from the `lists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: DbId,
    #[serde(rename = "user")]
    pub user_id: DbId,
    pub title: String,
    pub creation_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A list together with the ordered ids of its cards.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    #[serde(flatten)]
    pub list: List,
    pub cards: Vec<DbId>,
}

/// DTO for creating a new list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateList {
    pub title: String,
}

/// DTO for updating an existing list.
///
/// `cards`, when present, must hold exactly the list's current card ids in
/// the desired order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateList {
    pub title: Option<String>,
    pub cards: Option<Vec<DbId>>,
}
