//! Working-day policy.
//!
//! An explicit holiday override row always wins, in both directions. Without
//! one, Sunday is the only default non-working day.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc, Weekday};
use tracing::debug;

use crate::error::{JobError, StoreResource};
use crate::model::HolidayOverride;
use crate::store::RecordsStore;

#[derive(Debug, Clone, PartialEq)]
pub enum DecisionSource {
    Override { name: Option<String> },
    DefaultWeekly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HolidayDecision {
    pub date: NaiveDate,
    pub is_holiday: bool,
    pub source: DecisionSource,
}

impl HolidayDecision {
    pub fn from_override(date: NaiveDate, found: Option<&HolidayOverride>) -> Self {
        match found {
            Some(row) => Self {
                date,
                is_holiday: row.is_holiday,
                source: DecisionSource::Override {
                    name: row.name.clone(),
                },
            },
            None => Self {
                date,
                is_holiday: is_default_holiday(date),
                source: DecisionSource::DefaultWeekly,
            },
        }
    }
}

pub fn is_default_holiday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// Calendar views render Saturday as a weekend too, but the job does not.
pub fn is_display_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The calendar date at `now` in the business's fixed civil-time offset.
pub fn business_date(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// Looks up the override for `date` and applies the policy. A failed lookup is
/// an error, never a guess.
pub async fn decide(store: &dyn RecordsStore, date: NaiveDate) -> Result<HolidayDecision, JobError> {
    let found = store
        .get_holiday_override(date)
        .await
        .map_err(JobError::read(StoreResource::HolidayOverride))?;

    let decision = HolidayDecision::from_override(date, found.as_ref());
    debug!(%date, is_holiday = decision.is_holiday, source = ?decision.source, "Calendar policy evaluated");
    Ok(decision)
}

pub async fn is_holiday(store: &dyn RecordsStore, date: NaiveDate) -> Result<bool, JobError> {
    Ok(decide(store, date).await?.is_holiday)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::store::memory::StoreOp;
    use chrono::TimeZone;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn sunday_without_override_is_a_holiday() {
        // 2026-10-18 is a Sunday
        let decision = HolidayDecision::from_override(date("2026-10-18"), None);
        assert!(decision.is_holiday);
        assert_eq!(decision.source, DecisionSource::DefaultWeekly);
    }

    #[test]
    fn every_other_weekday_defaults_to_working() {
        for day in 12..=17 {
            let d = NaiveDate::from_ymd_opt(2026, 10, day).unwrap();
            assert!(!is_default_holiday(d), "{} should be a working day", d);
        }
    }

    #[test]
    fn saturday_is_working_but_displayed_as_weekend() {
        let saturday = date("2026-10-17");
        assert!(!is_default_holiday(saturday));
        assert!(is_display_weekend(saturday));
    }

    #[test]
    fn working_day_override_beats_sunday_default() {
        let sunday = date("2026-10-18");
        let row = HolidayOverride::new(sunday, false);
        assert!(!HolidayDecision::from_override(sunday, Some(&row)).is_holiday);
    }

    #[test]
    fn holiday_override_applies_on_any_weekday() {
        let tuesday = date("2026-10-20");
        let row = HolidayOverride::new(tuesday, true).named("Diwali");
        let decision = HolidayDecision::from_override(tuesday, Some(&row));
        assert!(decision.is_holiday);
        assert_eq!(
            decision.source,
            DecisionSource::Override {
                name: Some("Diwali".to_string())
            }
        );
    }

    #[test]
    fn business_date_uses_the_fixed_offset_not_utc() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        // 20:00 UTC on the 17th is 01:30 on the 18th in IST
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 20, 0, 0).unwrap();
        assert_eq!(business_date(now, ist), date("2026-10-18"));

        let earlier = Utc.with_ymd_and_hms(2026, 10, 17, 18, 29, 59).unwrap();
        assert_eq!(business_date(earlier, ist), date("2026-10-17"));
    }

    #[actix_web::test]
    async fn failed_lookup_is_fatal() {
        let store = InMemoryStore::new();
        store.fail_on(StoreOp::GetHolidayOverride);

        let err = is_holiday(&store, date("2026-10-20")).await.unwrap_err();
        assert!(matches!(
            err,
            JobError::StoreRead {
                resource: StoreResource::HolidayOverride,
                ..
            }
        ));
    }
}
