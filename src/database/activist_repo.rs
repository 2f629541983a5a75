use sqlx::{Executor, Sqlite, SqlitePool};

use crate::models::{ActivistExtraRow, ActivistInput, ActivistRow, BasicActivistRow};
use crate::services::query::{QueryPlan, SqlParam};

/// Base listing query. Every aggregate is a correlated subquery over the
/// one row being produced; the composer appends WHERE/GROUP/HAVING/ORDER
/// clauses after it.
pub const SQL_SELECT_ACTIVIST_EXTRA_BASE: &str = r#"
SELECT
  a.id,
  a.name,
  lower(a.email) AS email,
  a.phone,
  a.facebook,
  a.location,
  a.dob,
  a.hidden,

  a.activist_level,
  a.source,
  a.hiatus,

  a.connector,
  a.training0,
  a.training1,
  a.training2,
  a.training3,
  a.training4,
  a.training5,
  a.training6,
  a.dev_application_date,
  a.dev_application_type,
  a.dev_quiz,
  a.dev_manager,
  a.dev_interest,
  a.prospect_senior_organizer,
  a.cm_first_email,
  a.cm_approval_email,
  a.cm_warning_email,
  a.cir_first_email,
  a.prospect_organizer,
  a.prospect_chapter_member,
  a.referral_friends,
  a.referral_apply,
  a.referral_outlet,
  a.circle_interest,
  a.interest_date,
  a.survey_completion,
  a.mpi,
  a.notes,

  (SELECT min(e.date)
     FROM event_attendance ea
     JOIN events e ON e.id = ea.event_id
     WHERE ea.activist_id = a.id) AS first_event,

  (SELECT max(e.date)
     FROM event_attendance ea
     JOIN events e ON e.id = ea.event_id
     WHERE ea.activist_id = a.id) AS last_event,

  (SELECT e.date || ' ' || e.name
     FROM event_attendance ea
     JOIN events e ON e.id = ea.event_id
     WHERE ea.activist_id = a.id
     ORDER BY e.date ASC, e.id ASC
     LIMIT 1) AS first_event_name,

  (SELECT e.date || ' ' || e.name
     FROM event_attendance ea
     JOIN events e ON e.id = ea.event_id
     WHERE ea.activist_id = a.id
     ORDER BY e.date DESC, e.id DESC
     LIMIT 1) AS last_event_name,

  (SELECT count(DISTINCT ea.event_id)
     FROM event_attendance ea
     WHERE ea.activist_id = a.id) AS total_events,

  (SELECT count(ea.event_id)
     FROM event_attendance ea
     JOIN events e ON e.id = ea.event_id
     WHERE ea.activist_id = a.id
       AND e.date >= date('now', '-30 days')) AS total_points,

  ifnull((SELECT max(e.date)
     FROM event_attendance ea
     JOIN events e ON e.id = ea.event_id
     WHERE ea.activist_id = a.id) >= date('now', '-30 days'), 0) AS active,

  ifnull((SELECT group_concat(DISTINCT wg.name)
     FROM working_groups wg
     JOIN working_group_members wgm ON wg.id = wgm.working_group_id
     WHERE wgm.activist_id = a.id
       AND wgm.non_member_on_mailing_list = 0), '') AS working_group_list,

  ifnull((SELECT group_concat(DISTINCT c.name)
     FROM circles c
     JOIN circle_members cm ON c.id = cm.circle_id
     WHERE cm.activist_id = a.id), '') AS circles_list,

  (SELECT max(e.date)
     FROM event_attendance ea
     JOIN events e ON e.id = ea.event_id
     WHERE ea.activist_id = a.id
       AND e.event_type = 'Connection') AS last_connection,

  CASE
    WHEN EXISTS(SELECT 1 FROM event_attendance ea
                JOIN events e ON e.id = ea.event_id
                WHERE ea.activist_id = a.id
                  AND strftime('%Y-%m', e.date) = strftime('%Y-%m', 'now')
                  AND lower(e.event_type) IN
                    ('action', 'outreach', 'frontline surveillance',
                     'sanctuary', 'campaign action'))
    THEN
      CASE
        WHEN EXISTS(SELECT 1 FROM event_attendance ea
                    JOIN events e ON e.id = ea.event_id
                    WHERE ea.activist_id = a.id
                      AND strftime('%Y-%m', e.date) = strftime('%Y-%m', 'now')
                      AND lower(e.event_type) IN ('community', 'training', 'circle'))
        THEN 'Fulfilling requirements'
        ELSE 'Missing Community event'
      END
    ELSE
      CASE
        WHEN EXISTS(SELECT 1 FROM event_attendance ea
                    JOIN events e ON e.id = ea.event_id
                    WHERE ea.activist_id = a.id
                      AND strftime('%Y-%m', e.date) = strftime('%Y-%m', 'now')
                      AND lower(e.event_type) IN ('community', 'training', 'circle'))
        THEN 'Missing DA event'
        ELSE 'Missing Community & DA events'
      END
  END AS mpp_requirements

FROM activists a
"#;

const SQL_SELECT_ACTIVIST_BASE: &str = r#"
SELECT
  id,
  name,
  email,
  phone,
  facebook,
  location,
  dob,
  hidden
FROM activists
"#;

const SQL_INSERT_ACTIVIST: &str = r#"
INSERT INTO activists (
  name, email, phone, facebook, location, dob,
  activist_level, source, hiatus,
  connector,
  training0, training1, training2, training3, training4, training5, training6,
  dev_application_date, dev_application_type, dev_quiz, dev_manager, dev_interest,
  prospect_senior_organizer,
  cm_first_email, cm_approval_email, cm_warning_email, cir_first_email,
  prospect_organizer, prospect_chapter_member,
  referral_friends, referral_apply, referral_outlet,
  circle_interest, interest_date, survey_completion,
  mpi, notes
) VALUES (
  ?, ?, ?, ?, ?, ?,
  ?, ?, ?,
  ?,
  ?, ?, ?, ?, ?, ?, ?,
  ?, ?, ?, ?, ?,
  ?,
  ?, ?, ?, ?,
  ?, ?,
  ?, ?, ?,
  ?, ?, ?,
  ?, ?
)
"#;

const SQL_UPDATE_ACTIVIST: &str = r#"
UPDATE activists
SET
  name = ?,
  email = ?,
  phone = ?,
  facebook = ?,
  location = ?,
  dob = ?,
  activist_level = ?,
  source = ?,
  hiatus = ?,
  connector = ?,
  training0 = ?,
  training1 = ?,
  training2 = ?,
  training3 = ?,
  training4 = ?,
  training5 = ?,
  training6 = ?,
  dev_application_date = ?,
  dev_application_type = ?,
  dev_quiz = ?,
  dev_manager = ?,
  dev_interest = ?,
  prospect_senior_organizer = ?,
  cm_first_email = ?,
  cm_approval_email = ?,
  cm_warning_email = ?,
  cir_first_email = ?,
  prospect_organizer = ?,
  prospect_chapter_member = ?,
  referral_friends = ?,
  referral_apply = ?,
  referral_outlet = ?,
  circle_interest = ?,
  interest_date = ?,
  survey_completion = ?,
  mpi = ?,
  notes = ?
WHERE id = ?
"#;

/// Runs the composed listing query. The plan's suffix and binds come from
/// the query composer, which has already validated every dynamic piece.
pub async fn select_extra(pool: &SqlitePool, plan: &QueryPlan) -> sqlx::Result<Vec<ActivistExtraRow>> {
    let sql = format!("{SQL_SELECT_ACTIVIST_EXTRA_BASE}{}", plan.suffix);
    let mut query = sqlx::query_as::<_, ActivistExtraRow>(&sql);
    for param in &plan.binds {
        query = match param {
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v.as_str()),
        };
    }
    query.fetch_all(pool).await
}

/// Fetches one full record by id; used inside the merge transaction.
pub async fn fetch_extra_by_id<'e, E>(executor: E, id: i64) -> sqlx::Result<Option<ActivistExtraRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{SQL_SELECT_ACTIVIST_EXTRA_BASE} WHERE a.id = ?");
    sqlx::query_as::<_, ActivistExtraRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn fetch_by_name<'e, E>(executor: E, name: &str) -> sqlx::Result<Vec<ActivistRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{SQL_SELECT_ACTIVIST_BASE} WHERE name = ? ORDER BY name");
    sqlx::query_as::<_, ActivistRow>(&sql)
        .bind(name)
        .fetch_all(executor)
        .await
}

pub async fn insert<'e, E>(executor: E, input: &ActivistInput) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = bind_input(sqlx::query(SQL_INSERT_ACTIVIST), input)
        .execute(executor)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_bare<'e, E>(executor: E, name: &str) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("INSERT INTO activists (name) VALUES (?)")
        .bind(name)
        .execute(executor)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update(pool: &SqlitePool, input: &ActivistInput) -> sqlx::Result<u64> {
    let result = bind_input(sqlx::query(SQL_UPDATE_ACTIVIST), input)
        .bind(input.id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

fn bind_input<'q>(
    query: sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    input: &'q ActivistInput,
) -> sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    query
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.facebook)
        .bind(&input.location)
        .bind(&input.dob)
        .bind(&input.activist_level)
        .bind(&input.source)
        .bind(input.hiatus)
        .bind(&input.connector)
        .bind(&input.training0)
        .bind(&input.training1)
        .bind(&input.training2)
        .bind(&input.training3)
        .bind(&input.training4)
        .bind(&input.training5)
        .bind(&input.training6)
        .bind(input.dev_application_date)
        .bind(&input.dev_application_type)
        .bind(&input.dev_quiz)
        .bind(&input.dev_manager)
        .bind(&input.dev_interest)
        .bind(input.prospect_senior_organizer)
        .bind(&input.cm_first_email)
        .bind(&input.cm_approval_email)
        .bind(&input.cm_warning_email)
        .bind(&input.cir_first_email)
        .bind(input.prospect_organizer)
        .bind(input.prospect_chapter_member)
        .bind(&input.referral_friends)
        .bind(&input.referral_apply)
        .bind(&input.referral_outlet)
        .bind(input.circle_interest)
        .bind(&input.interest_date)
        .bind(&input.survey_completion)
        .bind(input.mpi)
        .bind(&input.notes)
}

/// Persists the field-merged record under the target's id. Identity and
/// event-aggregate columns are not written; only mergeable attributes.
pub async fn update_merged<'e, E>(executor: E, merged: &ActivistExtraRow) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
UPDATE activists
SET
  email = ?,
  phone = ?,
  facebook = ?,
  location = ?,
  dob = ?,
  activist_level = ?,
  source = ?,
  hiatus = ?,
  connector = ?,
  training0 = ?,
  training1 = ?,
  training2 = ?,
  training3 = ?,
  training4 = ?,
  training5 = ?,
  training6 = ?,
  dev_application_date = ?,
  dev_application_type = ?,
  dev_quiz = ?,
  dev_manager = ?,
  dev_interest = ?,
  prospect_senior_organizer = ?,
  cm_first_email = ?,
  cm_approval_email = ?,
  cm_warning_email = ?,
  cir_first_email = ?,
  prospect_organizer = ?,
  prospect_chapter_member = ?,
  referral_friends = ?,
  referral_apply = ?,
  referral_outlet = ?,
  circle_interest = ?,
  interest_date = ?,
  survey_completion = ?,
  mpi = ?,
  notes = ?
WHERE id = ?
"#,
    )
    .bind(&merged.activist.email)
    .bind(&merged.activist.phone)
    .bind(&merged.activist.facebook)
    .bind(&merged.activist.location)
    .bind(&merged.activist.dob)
    .bind(&merged.membership.activist_level)
    .bind(&merged.membership.source)
    .bind(merged.membership.hiatus)
    .bind(&merged.connection.connector)
    .bind(&merged.connection.training0)
    .bind(&merged.connection.training1)
    .bind(&merged.connection.training2)
    .bind(&merged.connection.training3)
    .bind(&merged.connection.training4)
    .bind(&merged.connection.training5)
    .bind(&merged.connection.training6)
    .bind(merged.connection.dev_application_date)
    .bind(&merged.connection.dev_application_type)
    .bind(&merged.connection.dev_quiz)
    .bind(&merged.connection.dev_manager)
    .bind(&merged.connection.dev_interest)
    .bind(merged.connection.prospect_senior_organizer)
    .bind(&merged.connection.cm_first_email)
    .bind(&merged.connection.cm_approval_email)
    .bind(&merged.connection.cm_warning_email)
    .bind(&merged.connection.cir_first_email)
    .bind(merged.connection.prospect_organizer)
    .bind(merged.connection.prospect_chapter_member)
    .bind(&merged.connection.referral_friends)
    .bind(&merged.connection.referral_apply)
    .bind(&merged.connection.referral_outlet)
    .bind(merged.connection.circle_interest)
    .bind(&merged.connection.interest_date)
    .bind(&merged.connection.survey_completion)
    .bind(merged.connection.mpi)
    .bind(&merged.connection.notes)
    .bind(merged.activist.id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn hide(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE activists SET hidden = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Retires an identity as the loser of a merge: hides the row and appends
/// the id to the name so the old name is free for reuse. One call site,
/// one state transition.
pub async fn retire_for_merge<'e, E>(executor: E, id: i64) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result =
        sqlx::query("UPDATE activists SET hidden = 1, name = name || ' ' || id WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
    Ok(result.rows_affected())
}

/// Non-hidden names ordered by most recent attendance, for autocomplete.
pub async fn recent_names(pool: &SqlitePool) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar(
        r#"
SELECT a.name
FROM activists a
LEFT OUTER JOIN event_attendance ea ON a.id = ea.activist_id
LEFT OUTER JOIN events e ON e.id = ea.event_id
WHERE a.hidden = 0
GROUP BY a.name
ORDER BY max(e.date) DESC
"#,
    )
    .fetch_all(pool)
    .await
}

pub async fn chapter_members(pool: &SqlitePool) -> sqlx::Result<Vec<BasicActivistRow>> {
    sqlx::query_as(
        r#"
SELECT id, name, email
FROM activists
WHERE hidden = 0
  AND activist_level IN ('Chapter Member', 'Organizer', 'Senior Organizer')
ORDER BY name
"#,
    )
    .fetch_all(pool)
    .await
}

pub async fn organizers(pool: &SqlitePool) -> sqlx::Result<Vec<BasicActivistRow>> {
    sqlx::query_as(
        r#"
SELECT id, name, email
FROM activists
WHERE hidden = 0
  AND activist_level IN ('Organizer', 'Senior Organizer')
ORDER BY name
"#,
    )
    .fetch_all(pool)
    .await
}
