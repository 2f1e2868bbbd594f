//! Repository for the `projects` table.

use std::collections::HashMap;

use sqlx::PgPool;
use taskboard_core::types::DbId;

use crate::models::project::{CreateProject, Project, ProjectCard, UpdateProject};
use crate::repositories::CardRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, due_date, estimated_hours, created_at, updated_at";

/// Cards and notes detached from a deleted project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetachedCounts {
    pub cards: u64,
    pub notes: u64,
}

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `user_id`, returning the created row.
    ///
    /// `input.title` is stored as given; callers trim and validate it.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (user_id, title, due_date, estimated_hours)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(input.due_date)
            .bind(input.estimated_hours)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's projects, most recently created first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Ids of the cards assigned to a project.
    pub async fn card_ids(pool: &PgPool, project_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT id FROM cards WHERE project_id = $1 ORDER BY id")
                .bind(project_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// `(project_id, card_id)` pairs for several projects.
    pub async fn card_ids_for_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT project_id, id FROM cards WHERE project_id = ANY($1) ORDER BY project_id, id",
        )
        .bind(project_ids)
        .fetch_all(pool)
        .await
    }

    /// A project's cards with their logged intervals populated.
    pub async fn cards_with_time(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectCard>, sqlx::Error> {
        let mut cards: Vec<ProjectCard> = sqlx::query_as(
            "SELECT id, title, due_date FROM cards WHERE project_id = $1 ORDER BY id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        let ids: Vec<DbId> = cards.iter().map(|c| c.id).collect();
        let mut by_card: HashMap<DbId, Vec<_>> = HashMap::new();
        for entry in CardRepo::time_entries_for_cards(pool, &ids).await? {
            by_card.entry(entry.card_id).or_default().push(entry);
        }
        for card in &mut cards {
            card.time_spent = by_card.remove(&card.id).unwrap_or_default();
        }
        Ok(cards)
    }

    /// Update a project. Absent fields keep their stored values; a present
    /// `due_date` or `estimated_hours` overwrites, `Some(None)` clearing it.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                due_date = CASE WHEN $3 THEN $4 ELSE due_date END,
                estimated_hours = CASE WHEN $5 THEN $6 ELSE estimated_hours END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.due_date.is_some())
            .bind(input.due_date.flatten())
            .bind(input.estimated_hours.is_some())
            .bind(input.estimated_hours.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete a project, first detaching its cards and notes.
    ///
    /// Dependent rows keep existing with `project_id = NULL`. Returns `None`
    /// if no project has the given `id`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<DetachedCounts>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let cards = sqlx::query("UPDATE cards SET project_id = NULL WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let notes = sqlx::query("UPDATE notes SET project_id = NULL WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(DetachedCounts { cards, notes }))
    }
}
