//! Repository for the `cards` and `card_time_entries` tables.
//!
//! List membership is the pair `(list_id, position)`: appending a card to a
//! list locks the list row and takes `MAX(position) + 1`, so a move is a
//! single-row update inside the same transaction as its activity entry.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use taskboard_core::types::{ActivityEntry, DbId, Timestamp};

use crate::models::card::{Card, CreateCard, StoppedTimer, TimeEntry, UpdateCard};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, list_id, project_id, position, title, description, due_date, \
                       estimated_hours, creation_date, ticking_from, checklist, activity_log, \
                       created_at, updated_at";

const ENTRY_COLUMNS: &str = "id, card_id, started_at, stopped_at";

/// Provides CRUD, move, and timer operations for cards.
pub struct CardRepo;

impl CardRepo {
    /// Insert a new card at the end of its list, returning the created row.
    ///
    /// `input.title` is stored as given; callers trim and validate it.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateCard,
    ) -> Result<Card, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let position = next_position(&mut tx, input.list).await?;
        let activity = vec![ActivityEntry::now(format!("Created in list {}", input.list))];

        let query = format!(
            "INSERT INTO cards
                (user_id, list_id, project_id, position, title, description, due_date,
                 estimated_hours, checklist, activity_log)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let card = sqlx::query_as::<_, Card>(&query)
            .bind(user_id)
            .bind(input.list)
            .bind(input.project)
            .bind(position)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(input.estimated_hours)
            .bind(Json(&input.checklist))
            .bind(Json(activity))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(card)
    }

    /// Find a card by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Card>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cards WHERE id = $1");
        sqlx::query_as::<_, Card>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's cards grouped by list, in list order.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Card>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cards WHERE user_id = $1 ORDER BY list_id, position, id"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// The user's card with a running timer, if any.
    pub async fn find_ticking_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Card>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cards WHERE user_id = $1 AND ticking_from IS NOT NULL"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Logged intervals of one card, oldest first.
    pub async fn time_entries(pool: &PgPool, card_id: DbId) -> Result<Vec<TimeEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM card_time_entries WHERE card_id = $1 ORDER BY started_at, id"
        );
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(card_id)
            .fetch_all(pool)
            .await
    }

    /// Logged intervals of several cards, oldest first.
    pub async fn time_entries_for_cards(
        pool: &PgPool,
        card_ids: &[DbId],
    ) -> Result<Vec<TimeEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM card_time_entries
             WHERE card_id = ANY($1)
             ORDER BY started_at, id"
        );
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(card_ids)
            .fetch_all(pool)
            .await
    }

    /// Ids of the notes attached to a card.
    pub async fn note_ids(pool: &PgPool, card_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT id FROM notes WHERE card_id = $1 ORDER BY date, id")
                .bind(card_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// `(card_id, note_id)` pairs for the notes attached to several cards.
    pub async fn note_ids_for_cards(
        pool: &PgPool,
        card_ids: &[DbId],
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT card_id, id FROM notes WHERE card_id = ANY($1) ORDER BY card_id, date, id",
        )
        .bind(card_ids)
        .fetch_all(pool)
        .await
    }

    /// Apply an update, moving the card between lists and projects atomically.
    ///
    /// A differing `input.list` appends the card to the destination list;
    /// `input.project` and the nullable fields follow the tri-state
    /// convention of [`UpdateCard`].
    /// A present `input.time_spent` replaces the whole interval log.
    /// Callers validate ownership of any referenced list or project.
    ///
    /// Returns `None` if no card has the given `id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCard,
    ) -> Result<Option<Card>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<(DbId, Option<DbId>)> =
            sqlx::query_as("SELECT list_id, project_id FROM cards WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((current_list, current_project)) = current else {
            return Ok(None);
        };

        let mut activity = Vec::new();

        let (list_id, position) = match input.list {
            Some(to) if to != current_list => {
                let position = next_position(&mut tx, to).await?;
                activity.push(ActivityEntry::now(format!(
                    "Moved from list {current_list} to list {to}"
                )));
                (to, Some(position))
            }
            _ => (current_list, None),
        };

        let project_id = input.project.unwrap_or(current_project);
        if project_id != current_project {
            activity.push(ActivityEntry::now(match project_id {
                Some(project) => format!("Assigned to project {project}"),
                None => "Removed from project".to_string(),
            }));
        }

        let query = format!(
            "UPDATE cards SET
                title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                due_date = CASE WHEN $5 THEN $6 ELSE due_date END,
                estimated_hours = CASE WHEN $7 THEN $8 ELSE estimated_hours END,
                list_id = $9,
                position = COALESCE($10, position),
                project_id = $11,
                checklist = COALESCE($12, checklist),
                activity_log = activity_log || $13
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let card = sqlx::query_as::<_, Card>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|v| v.as_deref()))
            .bind(input.due_date.is_some())
            .bind(input.due_date.flatten())
            .bind(input.estimated_hours.is_some())
            .bind(input.estimated_hours.flatten())
            .bind(list_id)
            .bind(position)
            .bind(project_id)
            .bind(input.checklist.as_ref().map(Json))
            .bind(Json(activity))
            .fetch_one(&mut *tx)
            .await?;

        if let Some(entries) = &input.time_spent {
            sqlx::query("DELETE FROM card_time_entries WHERE card_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for entry in entries {
                insert_entry(&mut tx, id, entry.start, entry.stop).await?;
            }
        }

        tx.commit().await?;
        Ok(Some(card))
    }

    /// Delete a card. Its time entries go with it; attached notes are detached.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Start the timer on a card, first closing any other running timer of
    /// the same user into a logged interval.
    ///
    /// Starting an already ticking card keeps its original start.
    /// Returns `None` if no card has the given `id`.
    pub async fn start_timer(
        pool: &PgPool,
        user_id: DbId,
        card_id: DbId,
        now: Timestamp,
    ) -> Result<Option<Card>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Concurrent starts by the same user queue here, so the loser sees
        // the winner's timer and closes it instead of tripping
        // `uq_cards_ticking_per_user`.
        sqlx::query("SELECT id FROM cards WHERE user_id = $1 ORDER BY id FOR UPDATE")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let running: Vec<(DbId, Timestamp)> = sqlx::query_as(
            "SELECT id, ticking_from FROM cards
             WHERE user_id = $1 AND ticking_from IS NOT NULL AND id <> $2
             FOR UPDATE",
        )
        .bind(user_id)
        .bind(card_id)
        .fetch_all(&mut *tx)
        .await?;

        for (other_id, from) in running {
            close_timer(&mut tx, other_id, from, now).await?;
            tracing::debug!(card_id = other_id, "Closed running timer before starting another");
        }

        let query = format!(
            "UPDATE cards SET
                activity_log = CASE WHEN ticking_from IS NULL
                                    THEN activity_log || $3
                                    ELSE activity_log END,
                ticking_from = COALESCE(ticking_from, $2)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let card = sqlx::query_as::<_, Card>(&query)
            .bind(card_id)
            .bind(now)
            .bind(Json(vec![ActivityEntry::now("Timer started")]))
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(card)
    }

    /// Stop the timer on a card, logging the open interval.
    ///
    /// Returns `None` if no card has the given `id`.
    pub async fn stop_timer(
        pool: &PgPool,
        card_id: DbId,
        now: Timestamp,
    ) -> Result<Option<StoppedTimer>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let ticking: Option<(Option<Timestamp>,)> =
            sqlx::query_as("SELECT ticking_from FROM cards WHERE id = $1 FOR UPDATE")
                .bind(card_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((ticking_from,)) = ticking else {
            return Ok(None);
        };

        let entry = match ticking_from {
            Some(from) => Some(close_timer(&mut tx, card_id, from, now).await?),
            None => None,
        };

        let query = format!("SELECT {COLUMNS} FROM cards WHERE id = $1");
        let card = sqlx::query_as::<_, Card>(&query)
            .bind(card_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(StoppedTimer { card, entry }))
    }
}

/// Lock `list_id` and return the position just past its last card.
async fn next_position(conn: &mut PgConnection, list_id: DbId) -> Result<i32, sqlx::Error> {
    sqlx::query("SELECT id FROM lists WHERE id = $1 FOR UPDATE")
        .bind(list_id)
        .execute(&mut *conn)
        .await?;

    let row: (i32,) =
        sqlx::query_as("SELECT COALESCE(MAX(position) + 1, 0) FROM cards WHERE list_id = $1")
            .bind(list_id)
            .fetch_one(&mut *conn)
            .await?;
    Ok(row.0)
}

async fn insert_entry(
    conn: &mut PgConnection,
    card_id: DbId,
    start: Timestamp,
    stop: Timestamp,
) -> Result<TimeEntry, sqlx::Error> {
    let query = format!(
        "INSERT INTO card_time_entries (card_id, started_at, stopped_at)
         VALUES ($1, $2, $3)
         RETURNING {ENTRY_COLUMNS}"
    );
    sqlx::query_as::<_, TimeEntry>(&query)
        .bind(card_id)
        .bind(start)
        .bind(stop)
        .fetch_one(&mut *conn)
        .await
}

/// Log `[from, now]` for a ticking card and clear its timer.
async fn close_timer(
    conn: &mut PgConnection,
    card_id: DbId,
    from: Timestamp,
    now: Timestamp,
) -> Result<TimeEntry, sqlx::Error> {
    let stop = now.max(from);
    let entry = insert_entry(conn, card_id, from, stop).await?;
    let minutes = (stop - from).num_minutes();

    sqlx::query(
        "UPDATE cards SET ticking_from = NULL, activity_log = activity_log || $2 WHERE id = $1",
    )
    .bind(card_id)
    .bind(Json(vec![ActivityEntry::now(format!(
        "Timer stopped after {minutes} min"
    ))]))
    .execute(&mut *conn)
    .await?;

    Ok(entry)
}
