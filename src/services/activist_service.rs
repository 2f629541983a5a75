use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::database::activist_repo;
use crate::error::{Error, Result};
use crate::models::{ActivistInput, ActivistLevel, ActivistRow, ActivistView, BasicActivistRow};
use crate::services::query::{ListOptions, QueryComposer};

/// Composes and runs a listing query, annotating each row with its
/// derived status. Id lookups go through [`get_activist`] instead.
pub async fn list_activists(
    pool: &SqlitePool,
    composer: &QueryComposer,
    options: &ListOptions,
) -> Result<Vec<ActivistView>> {
    if options.single_id.is_some() {
        return Err(Error::validation(
            "single_id",
            "listing cannot target a single id",
        ));
    }

    let plan = composer.compose(options)?;
    let rows = activist_repo::select_extra(pool, &plan).await?;

    let today = Utc::now().date_naive();
    Ok(rows
        .into_iter()
        .map(|row| ActivistView::from_row(row, today))
        .collect())
}

pub async fn get_activist(
    pool: &SqlitePool,
    composer: &QueryComposer,
    id: i64,
) -> Result<ActivistView> {
    let plan = composer.compose(&ListOptions::for_id(id))?;
    let mut rows = activist_repo::select_extra(pool, &plan).await?;

    match rows.len() {
        0 => Err(Error::NotFound),
        1 => Ok(ActivistView::from_row(
            rows.remove(0),
            Utc::now().date_naive(),
        )),
        n => Err(Error::Ambiguous(n)),
    }
}

pub async fn create_activist(pool: &SqlitePool, input: ActivistInput) -> Result<i64> {
    let input = input.normalize();
    if input.id != 0 {
        return Err(Error::validation("id", "id must be zero when creating"));
    }
    validate_input(&input)?;

    let id = activist_repo::insert(pool, &input).await?;
    info!(id, name = %input.name, "created activist");
    Ok(id)
}

pub async fn update_activist(pool: &SqlitePool, input: ActivistInput) -> Result<()> {
    let input = input.normalize();
    if input.id == 0 {
        return Err(Error::validation("id", "id cannot be zero when updating"));
    }
    validate_input(&input)?;

    let updated = activist_repo::update(pool, &input).await?;
    if updated == 0 {
        return Err(Error::NotFound);
    }
    Ok(())
}

/// Looks up an activist by name, creating a bare record on first contact.
/// Insert and re-read run in one transaction so a row never exists that
/// the caller did not observe.
pub async fn get_or_create_activist(pool: &SqlitePool, name: &str) -> Result<ActivistRow> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("name", "name cannot be empty"));
    }

    let mut existing = activist_repo::fetch_by_name(pool, name).await?;
    match existing.len() {
        0 => {}
        1 => return Ok(existing.remove(0)),
        n => return Err(Error::Ambiguous(n)),
    }

    let mut tx = pool.begin().await?;
    activist_repo::insert_bare(&mut *tx, name).await?;
    let mut created = activist_repo::fetch_by_name(&mut *tx, name).await?;
    if created.len() != 1 {
        return Err(Error::Ambiguous(created.len()));
    }
    tx.commit().await?;

    info!(name, "created activist on first contact");
    Ok(created.remove(0))
}

pub async fn hide_activist(pool: &SqlitePool, id: i64) -> Result<()> {
    if id == 0 {
        return Err(Error::validation("id", "id cannot be zero"));
    }
    if activist_repo::hide(pool, id).await? == 0 {
        return Err(Error::NotFound);
    }
    Ok(())
}

/// Non-hidden names ordered by most recent attendance, for autocomplete.
pub async fn recent_names(pool: &SqlitePool) -> Result<Vec<String>> {
    Ok(activist_repo::recent_names(pool).await?)
}

pub async fn chapter_members(pool: &SqlitePool) -> Result<Vec<BasicActivistRow>> {
    Ok(activist_repo::chapter_members(pool).await?)
}

pub async fn organizers(pool: &SqlitePool) -> Result<Vec<BasicActivistRow>> {
    Ok(activist_repo::organizers(pool).await?)
}

fn validate_input(input: &ActivistInput) -> Result<()> {
    if input.name.is_empty() {
        return Err(Error::validation("name", "name cannot be empty"));
    }
    if let Some(level) = input.activist_level.as_deref() {
        level.parse::<ActivistLevel>()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{attendance_repo, schema};
    use crate::models::Status;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        schema::init(&pool).await.unwrap();
        pool
    }

    fn named(name: &str) -> ActivistInput {
        ActivistInput {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let pool = setup().await;

        let first = get_or_create_activist(&pool, "Ada Lovelace").await.unwrap();
        let second = get_or_create_activist(&pool, "Ada Lovelace").await.unwrap();
        assert_eq!(first.id, second.id);

        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM activists")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let pool = setup().await;
        let composer = QueryComposer::default();

        let mut input = named("Rosa");
        input.email = Some("rosa@example.org".to_string());
        input.activist_level = Some("Supporter".to_string());
        let id = create_activist(&pool, input).await.unwrap();

        let view = get_activist(&pool, &composer, id).await.unwrap();
        assert_eq!(view.name, "Rosa");
        assert_eq!(view.email.as_deref(), Some("rosa@example.org"));
        assert_eq!(view.status, Status::NoAttendance);

        let err = get_activist(&pool, &composer, id + 99).await.unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }

    #[tokio::test]
    async fn create_rejects_malformed_level() {
        let pool = setup().await;
        let mut input = named("Marie");
        input.activist_level = Some("Supreme Leader".to_string());

        let err = create_activist(&pool, input).await.unwrap_err();
        assert!(matches!(err, Error::Validation { field: "activist_level", .. }));
    }

    #[tokio::test]
    async fn update_missing_activist_is_not_found() {
        let pool = setup().await;
        let mut input = named("Ghost");
        input.id = 42;

        let err = update_activist(&pool, input).await.unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }

    #[tokio::test]
    async fn listing_sorts_both_directions_and_skips_hidden() {
        let pool = setup().await;
        let composer = QueryComposer::default();

        for name in ["Carol", "Alice", "Bob"] {
            create_activist(&pool, named(name)).await.unwrap();
        }
        let hidden = get_or_create_activist(&pool, "Mallory").await.unwrap();
        hide_activist(&pool, hidden.id).await.unwrap();

        let asc = list_activists(&pool, &composer, &ListOptions::default())
            .await
            .unwrap();
        let names: Vec<&str> = asc.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);

        let desc = list_activists(
            &pool,
            &composer,
            &ListOptions {
                sort_direction: crate::services::query::SortDirection::Desc,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let names: Vec<&str> = desc.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Bob", "Alice"]);
    }

    #[tokio::test]
    async fn listing_rejects_single_id() {
        let pool = setup().await;
        let composer = QueryComposer::default();

        let err = list_activists(&pool, &composer, &ListOptions::for_id(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "single_id", .. }));
    }

    #[tokio::test]
    async fn attendance_shapes_status_and_totals() {
        let pool = setup().await;
        let composer = QueryComposer::default();

        let activist = get_or_create_activist(&pool, "Joaquin").await.unwrap();
        let today = Utc::now().date_naive();
        let recent = today - chrono::Duration::days(3);

        let event_id: i64 =
            sqlx::query("INSERT INTO events (name, date, event_type) VALUES ('march', ?, 'Action')")
                .bind(recent)
                .execute(&pool)
                .await
                .unwrap()
                .last_insert_rowid();
        attendance_repo::insert(&pool, activist.id, event_id)
            .await
            .unwrap();

        let view = get_activist(&pool, &composer, activist.id).await.unwrap();
        assert_eq!(view.total_events, 1);
        assert_eq!(view.total_points, 1);
        assert!(view.active);
        assert_eq!(view.status, Status::New);
        assert_eq!(view.last_event, Some(recent));
    }

    #[tokio::test]
    async fn rosters_filter_by_level() {
        let pool = setup().await;

        let mut organizer = named("Olive");
        organizer.activist_level = Some("Organizer".to_string());
        create_activist(&pool, organizer).await.unwrap();

        let mut member = named("Casey");
        member.activist_level = Some("Chapter Member".to_string());
        create_activist(&pool, member).await.unwrap();

        let mut supporter = named("Sam");
        supporter.activist_level = Some("Supporter".to_string());
        create_activist(&pool, supporter).await.unwrap();

        let members = chapter_members(&pool).await.unwrap();
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Casey", "Olive"]);

        let orgs = organizers(&pool).await.unwrap();
        let names: Vec<&str> = orgs.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Olive"]);
    }
}
