use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{JobError, StoreResource};
use crate::store::RecordsStore;

/// Ids of every active, employee-role profile.
pub async fn active_employees(store: &dyn RecordsStore) -> Result<Vec<Uuid>, JobError> {
    let employees = store
        .list_active_employees()
        .await
        .map_err(JobError::read(StoreResource::Roster))?;

    Ok(employees
        .into_iter()
        .filter(|e| e.is_tracked())
        .map(|e| e.id)
        .collect())
}

/// Employees that already have a record on `date`, whatever its status.
pub async fn attendance_ids_for_date(
    store: &dyn RecordsStore,
    date: NaiveDate,
) -> Result<HashSet<Uuid>, JobError> {
    let ids = store
        .list_attendance_for_date(date)
        .await
        .map_err(JobError::read(StoreResource::Attendance))?;

    Ok(ids.into_iter().collect())
}
