use chrono::{Datelike, Weekday};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{JobError, StoreResource};
use crate::store::RecordsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PruneReport {
    pub found: usize,
    pub deleted: usize,
}

/// Removes every holiday override dated on a Saturday.
///
/// Saturday is a working day by default, so these rows are either redundant
/// or weekend markings left behind by the calendar views.
pub async fn prune_saturday_overrides(
    store: &dyn RecordsStore,
    dry_run: bool,
) -> Result<PruneReport, JobError> {
    let overrides = store
        .list_holiday_overrides()
        .await
        .map_err(JobError::read(StoreResource::HolidayOverride))?;

    let saturdays: Vec<_> = overrides
        .iter()
        .filter(|h| h.date.weekday() == Weekday::Sat)
        .collect();
    let ids: Vec<Uuid> = saturdays.iter().filter_map(|h| h.id).collect();
    if ids.len() < saturdays.len() {
        warn!(
            without_id = saturdays.len() - ids.len(),
            "Saturday overrides without an id cannot be deleted"
        );
    }

    let mut report = PruneReport {
        found: saturdays.len(),
        deleted: 0,
    };
    if ids.is_empty() || dry_run {
        info!(found = report.found, dry_run, "Saturday override prune finished");
        return Ok(report);
    }

    report.deleted = store
        .delete_holiday_overrides(&ids)
        .await
        .map_err(JobError::delete(StoreResource::HolidayOverride))?;
    info!(found = report.found, deleted = report.deleted, "Saturday overrides deleted");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HolidayOverride;
    use crate::store::memory::{InMemoryStore, StoreOp};
    use chrono::NaiveDate;

    fn store() -> InMemoryStore {
        let day = |d| NaiveDate::from_ymd_opt(2026, 10, d).unwrap();
        InMemoryStore::new()
            .with_holiday(HolidayOverride::new(day(17), true).named("Saturday"))
            .with_holiday(HolidayOverride::new(day(24), false))
            .with_holiday(HolidayOverride::new(day(18), true).named("Sunday"))
            .with_holiday(HolidayOverride::new(day(20), true).named("Diwali"))
    }

    #[actix_web::test]
    async fn deletes_only_saturday_rows() {
        let store = store();

        let report = prune_saturday_overrides(&store, false).await.unwrap();

        assert_eq!(report, PruneReport { found: 2, deleted: 2 });
        let left: Vec<_> = store.holidays().iter().map(|h| h.date.weekday()).collect();
        assert_eq!(left.len(), 2);
        assert!(!left.contains(&Weekday::Sat));
    }

    #[actix_web::test]
    async fn dry_run_leaves_rows_in_place() {
        let store = store();

        let report = prune_saturday_overrides(&store, true).await.unwrap();

        assert_eq!(report, PruneReport { found: 2, deleted: 0 });
        assert_eq!(store.holidays().len(), 4);
        assert_eq!(store.calls(StoreOp::DeleteHolidayOverrides), 0);
    }

    #[actix_web::test]
    async fn nothing_to_prune_makes_no_delete_call() {
        let store = InMemoryStore::new();

        let report = prune_saturday_overrides(&store, false).await.unwrap();

        assert_eq!(report, PruneReport::default());
        assert_eq!(store.calls(StoreOp::DeleteHolidayOverrides), 0);
    }

    #[actix_web::test]
    async fn failed_delete_is_reported_as_a_holiday_override_delete() {
        let store = store();
        store.fail_on(StoreOp::DeleteHolidayOverrides);

        let err = prune_saturday_overrides(&store, false).await.unwrap_err();

        assert!(matches!(
            err,
            JobError::StoreDelete {
                resource: StoreResource::HolidayOverride,
                ..
            }
        ));
        let message = err.to_string();
        assert!(message.starts_with("Failed to delete holiday_override"), "{}", message);
        assert!(!message.contains("attendance"), "{}", message);
        assert_eq!(store.holidays().len(), 4);
    }
}
