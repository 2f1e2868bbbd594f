//! Repository for the `lists` table.
//!
//! A list's card collection is derived from `cards.list_id`, ordered by
//! `cards.position`.

use sqlx::PgPool;
use taskboard_core::types::DbId;

use crate::models::list::List;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, creation_date, created_at, updated_at";

/// Provides CRUD operations for lists.
pub struct ListRepo;

impl ListRepo {
    /// Insert a new list owned by `user_id`, returning the created row.
    pub async fn create(pool: &PgPool, user_id: DbId, title: &str) -> Result<List, sqlx::Error> {
        let query = format!(
            "INSERT INTO lists (user_id, title)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, List>(&query)
            .bind(user_id)
            .bind(title)
            .fetch_one(pool)
            .await
    }

    /// Find a list by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<List>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lists WHERE id = $1");
        sqlx::query_as::<_, List>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every list owned by a user, oldest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<List>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lists WHERE user_id = $1 ORDER BY creation_date, id"
        );
        sqlx::query_as::<_, List>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// `(user_id, list_id)` pairs for every list, oldest first.
    pub async fn owner_pairs(pool: &PgPool) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        sqlx::query_as("SELECT user_id, id FROM lists ORDER BY creation_date, id")
            .fetch_all(pool)
            .await
    }

    /// Ordered ids of the cards in a list.
    pub async fn card_ids(pool: &PgPool, list_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT id FROM cards WHERE list_id = $1 ORDER BY position, id")
                .bind(list_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// `(list_id, card_id)` pairs for several lists, each list's cards in order.
    pub async fn card_ids_for_lists(
        pool: &PgPool,
        list_ids: &[DbId],
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT list_id, id FROM cards WHERE list_id = ANY($1) ORDER BY list_id, position, id",
        )
        .bind(list_ids)
        .fetch_all(pool)
        .await
    }

    /// Update a list's title and, optionally, the order of its cards.
    ///
    /// `order` must contain exactly the list's current card ids; callers
    /// validate this beforehand. Returns `None` if no list has the given `id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        title: Option<&str>,
        order: Option<&[DbId]>,
    ) -> Result<Option<List>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE lists SET title = COALESCE($2, title)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let list = sqlx::query_as::<_, List>(&query)
            .bind(id)
            .bind(title)
            .fetch_optional(&mut *tx)
            .await?;

        if list.is_none() {
            return Ok(None);
        }

        if let Some(order) = order {
            sqlx::query(
                "UPDATE cards SET position = (o.ord - 1)::int
                 FROM UNNEST($2::bigint[]) WITH ORDINALITY AS o(card_id, ord)
                 WHERE cards.id = o.card_id AND cards.list_id = $1",
            )
            .bind(id)
            .bind(order)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(list)
    }

    /// Delete a list only if it holds no cards.
    ///
    /// Returns `true` if the row was removed, `false` if it is missing or
    /// still has cards.
    pub async fn delete_if_empty(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM lists
             WHERE id = $1 AND NOT EXISTS (SELECT 1 FROM cards WHERE list_id = $1)",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
