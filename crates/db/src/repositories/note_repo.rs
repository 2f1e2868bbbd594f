//! Repository for the `notes` table.

use sqlx::PgPool;
use taskboard_core::types::DbId;

use crate::models::note::{CreateNote, Note, UpdateNote};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, card_id, project_id, title, content, label, colour, date, created_at, updated_at";

/// Provides CRUD operations for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a new note owned by `user_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateNote,
    ) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (user_id, card_id, project_id, title, content, label, colour)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(user_id)
            .bind(input.card)
            .bind(input.project)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.label)
            .bind(&input.colour)
            .fetch_one(pool)
            .await
    }

    /// Find a note by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's notes, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Note>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM notes WHERE user_id = $1 ORDER BY date DESC, id DESC");
        sqlx::query_as::<_, Note>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a note. Every field except `content` follows the tri-state
    /// convention of [`UpdateNote`].
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNote,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET
                content = COALESCE($2, content),
                title = CASE WHEN $3 THEN $4 ELSE title END,
                label = CASE WHEN $5 THEN $6 ELSE label END,
                colour = CASE WHEN $7 THEN $8 ELSE colour END,
                card_id = CASE WHEN $9 THEN $10 ELSE card_id END,
                project_id = CASE WHEN $11 THEN $12 ELSE project_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(&input.content)
            .bind(input.title.is_some())
            .bind(input.title.as_ref().and_then(|v| v.as_deref()))
            .bind(input.label.is_some())
            .bind(input.label.as_ref().and_then(|v| v.as_deref()))
            .bind(input.colour.is_some())
            .bind(input.colour.as_ref().and_then(|v| v.as_deref()))
            .bind(input.card.is_some())
            .bind(input.card.flatten())
            .bind(input.project.is_some())
            .bind(input.project.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete a note. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
