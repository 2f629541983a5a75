use sqlx::{Executor, QueryBuilder, Sqlite};

/// Audit row as read back by tests and tooling.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MergeAuditRow {
    pub original_activist_id: i64,
    pub target_activist_id: i64,
    pub event_id: i64,
    pub replaced_with_target: bool,
}

/// Appends one audit row per touched event. Rows are immutable once
/// written; nothing in the codebase updates or deletes them.
pub async fn insert_many<'e, E>(
    executor: E,
    original_id: i64,
    target_id: i64,
    event_ids: &[i64],
    replaced_with_target: bool,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    if event_ids.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "INSERT INTO merged_activist_attendance \
         (original_activist_id, target_activist_id, event_id, replaced_with_target) ",
    );
    builder.push_values(event_ids, |mut row, event_id| {
        row.push_bind(original_id)
            .push_bind(target_id)
            .push_bind(*event_id)
            .push_bind(replaced_with_target);
    });

    let result = builder.build().execute(executor).await?;
    Ok(result.rows_affected())
}

pub async fn for_merge<'e, E>(
    executor: E,
    original_id: i64,
    target_id: i64,
) -> sqlx::Result<Vec<MergeAuditRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        r#"
SELECT original_activist_id, target_activist_id, event_id, replaced_with_target
FROM merged_activist_attendance
WHERE original_activist_id = ? AND target_activist_id = ?
ORDER BY event_id
"#,
    )
    .bind(original_id)
    .bind(target_id)
    .fetch_all(executor)
    .await
}
