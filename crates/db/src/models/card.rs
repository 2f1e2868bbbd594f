//! Card entity model, time entries, and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use taskboard_core::reference;
use taskboard_core::time_report::Interval;
use taskboard_core::types::{ActivityEntry, ChecklistItem, DbId, Timestamp};

/// A card row from the `cards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: DbId,
    #[serde(rename = "user")]
    pub user_id: DbId,
    #[serde(rename = "list")]
    pub list_id: DbId,
    #[serde(rename = "project")]
    pub project_id: Option<DbId>,
    /// Zero-based order within the owning list (gaps allowed).
    #[serde(skip)]
    pub position: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    pub creation_date: Timestamp,
    /// Start of the running timer; `None` when not ticking.
    pub ticking_from: Option<Timestamp>,
    pub checklist: Json<Vec<ChecklistItem>>,
    pub activity_log: Json<Vec<ActivityEntry>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A closed interval from the `card_time_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimeEntry {
    pub id: DbId,
    #[serde(skip)]
    pub card_id: DbId,
    #[serde(rename = "start")]
    pub started_at: Timestamp,
    #[serde(rename = "stop")]
    pub stopped_at: Timestamp,
}

impl TimeEntry {
    pub fn interval(&self) -> Interval {
        Interval::new(self.started_at, self.stopped_at)
    }
}

/// A card with its logged intervals and attached note ids.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    #[serde(flatten)]
    pub card: Card,
    pub time_spent: Vec<TimeEntry>,
    pub notes: Vec<DbId>,
}

/// Client-supplied interval used to replace a card's time log.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NewTimeEntry {
    pub start: Timestamp,
    pub stop: Timestamp,
}

/// DTO for creating a new card.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCard {
    pub title: String,
    pub list: DbId,
    pub description: Option<String>,
    pub due_date: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    #[serde(default, deserialize_with = "reference::optional_ref")]
    pub project: Option<DbId>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
}

/// DTO for updating a card. Absent fields keep their stored values.
///
/// `project` is tri-state: absent keeps, `null`/`""` clears, an id reassigns.
/// `description`, `due_date` and `estimated_hours` clear on `null`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCard {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "reference::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "reference::nullable")]
    pub due_date: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "reference::nullable")]
    pub estimated_hours: Option<Option<f64>>,
    pub list: Option<DbId>,
    #[serde(default, deserialize_with = "reference::nullable_ref")]
    pub project: Option<Option<DbId>>,
    pub checklist: Option<Vec<ChecklistItem>>,
    pub time_spent: Option<Vec<NewTimeEntry>>,
}

/// Outcome of stopping a card's timer.
#[derive(Debug, Clone)]
pub struct StoppedTimer {
    pub card: Card,
    /// The interval that was logged, `None` if the card was not ticking.
    pub entry: Option<TimeEntry>,
}
