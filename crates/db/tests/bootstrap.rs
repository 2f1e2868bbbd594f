use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    taskboard_db::health_check(&pool).await.unwrap();

    let status = taskboard_db::board_status(&pool).await.unwrap();
    assert_eq!(status.schema_version, 20240101000005);
    assert_eq!(status.running_timers, 0);

    let tables = ["users", "lists", "projects", "cards", "card_time_entries", "notes"];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}
