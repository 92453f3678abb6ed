use tracing::{debug, info};

use crate::error::JobError;
use crate::model::NewAttendance;
use crate::store::RecordsStore;

/// Inserts the drafts in one batch and returns how many rows the store created.
///
/// An empty batch is never sent. Uniqueness violations are returned as
/// [`JobError::StoreWrite`]; callers filter out existing records beforehand.
pub async fn insert_absentees(
    store: &dyn RecordsStore,
    drafts: &[NewAttendance],
) -> Result<usize, JobError> {
    if drafts.is_empty() {
        debug!("No absentee drafts, skipping insert");
        return Ok(0);
    }

    let created = store
        .insert_attendance_batch(drafts)
        .await
        .map_err(JobError::StoreWrite)?;

    info!(requested = drafts.len(), created = created.len(), "Absentee batch inserted");
    Ok(created.len())
}
