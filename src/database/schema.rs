use sqlx::SqlitePool;

/// Table definitions. The UNIQUE pair on event_attendance is the
/// invariant the merge path must preserve: at most one attendance row per
/// (activist, event).
const SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS activists (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    email TEXT,
    phone TEXT,
    facebook TEXT,
    location TEXT,
    dob TEXT,
    hidden INTEGER NOT NULL DEFAULT 0,

    activist_level TEXT,
    source TEXT,
    hiatus INTEGER NOT NULL DEFAULT 0,

    connector TEXT,
    training0 TEXT,
    training1 TEXT,
    training2 TEXT,
    training3 TEXT,
    training4 TEXT,
    training5 TEXT,
    training6 TEXT,
    dev_application_date TEXT,
    dev_application_type TEXT,
    dev_quiz TEXT,
    dev_manager TEXT,
    dev_interest TEXT,
    prospect_senior_organizer INTEGER NOT NULL DEFAULT 0,
    cm_first_email TEXT,
    cm_approval_email TEXT,
    cm_warning_email TEXT,
    cir_first_email TEXT,
    prospect_organizer INTEGER NOT NULL DEFAULT 0,
    prospect_chapter_member INTEGER NOT NULL DEFAULT 0,
    referral_friends TEXT,
    referral_apply TEXT,
    referral_outlet TEXT,
    circle_interest INTEGER NOT NULL DEFAULT 0,
    interest_date TEXT,
    survey_completion TEXT,
    mpi INTEGER NOT NULL DEFAULT 0,
    notes TEXT
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    date TEXT NOT NULL,
    event_type TEXT NOT NULL DEFAULT ''
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS event_attendance (
    activist_id INTEGER NOT NULL,
    event_id INTEGER NOT NULL,
    UNIQUE (activist_id, event_id)
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS merged_activist_attendance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    original_activist_id INTEGER NOT NULL,
    target_activist_id INTEGER NOT NULL,
    event_id INTEGER NOT NULL,
    replaced_with_target INTEGER NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS working_groups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS working_group_members (
    working_group_id INTEGER NOT NULL,
    activist_id INTEGER NOT NULL,
    non_member_on_mailing_list INTEGER NOT NULL DEFAULT 0,
    UNIQUE (working_group_id, activist_id)
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS circles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS circle_members (
    circle_id INTEGER NOT NULL,
    activist_id INTEGER NOT NULL,
    UNIQUE (circle_id, activist_id)
)
"#,
];

pub async fn init(pool: &SqlitePool) -> sqlx::Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
