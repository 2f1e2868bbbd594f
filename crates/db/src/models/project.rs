//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::reference;
use taskboard_core::time_report::TimeReport;
use taskboard_core::types::{DbId, Timestamp};

use crate::models::card::TimeEntry;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    #[serde(rename = "user")]
    pub user_id: DbId,
    pub title: String,
    pub due_date: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project together with the ids of its member cards.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectResponse {
    #[serde(flatten)]
    pub project: Project,
    pub cards: Vec<DbId>,
}

/// Card summary embedded in a project report.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCard {
    pub id: DbId,
    pub title: String,
    pub due_date: Option<Timestamp>,
    #[sqlx(skip)]
    pub time_spent: Vec<TimeEntry>,
}

/// A project with its populated cards and time figures.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    #[serde(flatten)]
    pub project: Project,
    pub cards: Vec<ProjectCard>,
    #[serde(flatten)]
    pub report: TimeReport,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub title: String,
    pub due_date: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
}

/// DTO for updating an existing project.
///
/// `due_date` and `estimated_hours` are tri-state: absent keeps the stored
/// value, `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "reference::nullable")]
    pub due_date: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "reference::nullable")]
    pub estimated_hours: Option<Option<f64>>,
}
