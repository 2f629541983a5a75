use sqlx::SqlitePool;
use tracing::info;

use crate::database::{activist_repo, attendance_repo, merge_audit_repo};
use crate::error::{Error, Result};
use crate::services::field_merge;

/// Merges the original activist into the target inside one transaction:
///
/// 1. retire the original (hide + rename, freeing its name)
/// 2. partition the original's events by target overlap
/// 3. reassign the events only the original attended, audited as replaced
/// 4. delete the overlapping rows (the target already has them), audited
///    as dropped
/// 5. re-fetch both records and persist the field merge under the
///    target's id
///
/// Any failure rolls the whole transaction back; no partial reassignment
/// or partial field merge is ever visible.
pub async fn merge_activists(pool: &SqlitePool, original_id: i64, target_id: i64) -> Result<()> {
    if original_id == 0 {
        return Err(Error::validation("original_id", "id cannot be zero"));
    }
    if target_id == 0 {
        return Err(Error::validation("target_id", "id cannot be zero"));
    }
    if original_id == target_id {
        return Err(Error::validation(
            "target_id",
            "original and target must differ",
        ));
    }

    let mut tx = pool.begin().await?;

    let retired = activist_repo::retire_for_merge(&mut *tx, original_id).await?;
    if retired == 0 {
        return Err(Error::NotFound);
    }

    let reassignable =
        attendance_repo::partition_event_ids(&mut *tx, original_id, target_id, false).await?;
    let duplicated =
        attendance_repo::partition_event_ids(&mut *tx, original_id, target_id, true).await?;

    attendance_repo::reassign_events(&mut *tx, original_id, target_id, &reassignable).await?;
    merge_audit_repo::insert_many(&mut *tx, original_id, target_id, &reassignable, true).await?;

    attendance_repo::delete_events(&mut *tx, original_id, &duplicated).await?;
    merge_audit_repo::insert_many(&mut *tx, original_id, target_id, &duplicated, false).await?;

    let original = activist_repo::fetch_extra_by_id(&mut *tx, original_id)
        .await?
        .ok_or(Error::NotFound)?;
    let target = activist_repo::fetch_extra_by_id(&mut *tx, target_id)
        .await?
        .ok_or(Error::NotFound)?;

    let merged = field_merge::merge(&original, &target);
    activist_repo::update_merged(&mut *tx, &merged).await?;

    tx.commit().await?;

    info!(
        original_id,
        target_id,
        reassigned = reassignable.len(),
        deduplicated = duplicated.len(),
        "merged activists"
    );
    Ok(())
}
