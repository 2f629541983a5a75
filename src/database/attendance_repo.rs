use sqlx::{Executor, QueryBuilder, Sqlite};

/// Event ids the original activist attended, split by whether the target
/// also attended them. `shared = false` returns events only the original
/// attended; `shared = true` returns the overlap.
pub async fn partition_event_ids<'e, E>(
    executor: E,
    original_id: i64,
    target_id: i64,
    shared: bool,
) -> sqlx::Result<Vec<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let exists = r#"
EXISTS (
  SELECT 1
  FROM event_attendance ea2
  WHERE ea2.activist_id = ?
    AND ea2.event_id = ea.event_id)"#;

    let sql = format!(
        "SELECT event_id FROM event_attendance ea WHERE ea.activist_id = ? AND {}{}",
        if shared { "" } else { "NOT " },
        exists,
    );

    sqlx::query_scalar(&sql)
        .bind(original_id)
        .bind(target_id)
        .fetch_all(executor)
        .await
}

/// Bulk-reassigns the given events from the original to the target.
pub async fn reassign_events<'e, E>(
    executor: E,
    original_id: i64,
    target_id: i64,
    event_ids: &[i64],
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    if event_ids.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE event_attendance SET activist_id = ");
    builder.push_bind(target_id);
    builder.push(" WHERE activist_id = ");
    builder.push_bind(original_id);
    builder.push(" AND event_id IN (");
    let mut separated = builder.separated(", ");
    for event_id in event_ids {
        separated.push_bind(*event_id);
    }
    builder.push(")");

    let result = builder.build().execute(executor).await?;
    Ok(result.rows_affected())
}

/// Drops the original's attendance rows for events the target already
/// attended, preserving the unique (activist, event) pair.
pub async fn delete_events<'e, E>(
    executor: E,
    activist_id: i64,
    event_ids: &[i64],
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    if event_ids.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("DELETE FROM event_attendance WHERE activist_id = ");
    builder.push_bind(activist_id);
    builder.push(" AND event_id IN (");
    let mut separated = builder.separated(", ");
    for event_id in event_ids {
        separated.push_bind(*event_id);
    }
    builder.push(")");

    let result = builder.build().execute(executor).await?;
    Ok(result.rows_affected())
}

/// Records attendance. A repeat record for the same (activist, event)
/// pair is a no-op.
pub async fn insert<'e, E>(executor: E, activist_id: i64, event_id: i64) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT OR IGNORE INTO event_attendance (activist_id, event_id) VALUES (?, ?)",
    )
    .bind(activist_id)
    .bind(event_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
