//! Shared primitive aliases and small value types embedded in card rows.

use serde::{Deserialize, Serialize};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Completion state of a single checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecklistStatus {
    #[serde(rename = "Done")]
    Done,
    #[serde(rename = "To-do")]
    Todo,
}

/// One line of a card checklist, stored inside the card's JSONB column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub task: String,
    pub status: ChecklistStatus,
}

/// Best-effort history line appended to a card when something notable happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub at: Timestamp,
    pub message: String,
}

impl ActivityEntry {
    /// Entry stamped with the current time.
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            at: chrono::Utc::now(),
            message: message.into(),
        }
    }
}
