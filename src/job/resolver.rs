use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::model::NewAttendance;

/// `roster - attended`, as auto-absent drafts for `date`.
///
/// A roster id listed twice yields one draft.
pub fn resolve(
    roster: &[Uuid],
    attended: &HashSet<Uuid>,
    date: NaiveDate,
    approved_at: DateTime<Utc>,
) -> Vec<NewAttendance> {
    let mut seen = HashSet::with_capacity(roster.len());

    roster
        .iter()
        .filter(|id| !attended.contains(*id) && seen.insert(**id))
        .map(|id| NewAttendance::auto_absent(*id, date, approved_at))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttendanceStatus, attendance::AUTO_ABSENT_REASON};
    use proptest::prelude::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
    }

    #[test]
    fn drafts_carry_the_auto_absent_fields() {
        let roster = ids(1);
        let now = Utc::now();

        let drafts = resolve(&roster, &HashSet::new(), tuesday(), now);

        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.employee_id, roster[0]);
        assert_eq!(draft.date, tuesday());
        assert_eq!(draft.status, AttendanceStatus::Absent);
        assert_eq!(draft.work_mode, None);
        assert_eq!(draft.reason.as_deref(), Some(AUTO_ABSENT_REASON));
        assert_eq!(draft.check_in_time, None);
        assert_eq!(draft.check_out_time, None);
        assert!(draft.is_approved);
        assert_eq!(draft.approved_by, None);
        assert_eq!(draft.approved_at, Some(now));
    }

    #[test]
    fn empty_roster_resolves_to_nothing() {
        let attended: HashSet<Uuid> = ids(3).into_iter().collect();
        assert!(resolve(&[], &attended, tuesday(), Utc::now()).is_empty());
    }

    #[test]
    fn fully_attended_roster_resolves_to_nothing() {
        let roster = ids(4);
        let attended: HashSet<Uuid> = roster.iter().copied().collect();
        assert!(resolve(&roster, &attended, tuesday(), Utc::now()).is_empty());
    }

    #[test]
    fn duplicate_roster_entries_produce_one_draft() {
        let id = Uuid::new_v4();
        let drafts = resolve(&[id, id], &HashSet::new(), tuesday(), Utc::now());
        assert_eq!(drafts.len(), 1);
    }

    proptest! {
        #[test]
        fn output_is_exactly_the_set_difference(
            roster_size in 0usize..40,
            attended_mask in proptest::collection::vec(any::<bool>(), 40),
            strangers in 0usize..5,
        ) {
            let roster = ids(roster_size);
            let mut attended: HashSet<Uuid> = roster
                .iter()
                .zip(attended_mask.iter())
                .filter(|(_, present)| **present)
                .map(|(id, _)| *id)
                .collect();
            // attendance for people outside the roster must not matter
            attended.extend(ids(strangers));

            let drafts = resolve(&roster, &attended, tuesday(), Utc::now());

            let got: HashSet<Uuid> = drafts.iter().map(|d| d.employee_id).collect();
            let expected: HashSet<Uuid> = roster
                .iter()
                .filter(|id| !attended.contains(*id))
                .copied()
                .collect();
            prop_assert_eq!(drafts.len(), got.len());
            prop_assert_eq!(got, expected);
        }
    }
}
