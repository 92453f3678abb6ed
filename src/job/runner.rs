use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use strum_macros::Display;
use tracing::{debug, error, info, instrument};

use super::{calendar, resolver, snapshot, writer};
use crate::error::JobError;
use crate::store::RecordsStore;

/// What invoked the job. Only affects logging; the core is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Trigger {
    Scheduled,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Authenticating,
    ResolvingDate,
    CheckingHoliday,
    Fetching,
    Resolving,
    Writing,
}

pub fn enter(stage: JobStage) {
    debug!(?stage, "Absentee job stage");
}

/// Terminal, successful states of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Holiday,
    NothingToDo,
    Inserted(usize),
}

#[derive(Debug, Clone)]
pub struct JobRequest {
    pub date: NaiveDate,
    pub approved_at: DateTime<Utc>,
    pub trigger: Trigger,
}

impl JobRequest {
    /// A run for the business date containing `now`.
    pub fn at(now: DateTime<Utc>, offset: FixedOffset, trigger: Trigger) -> Self {
        enter(JobStage::ResolvingDate);
        Self {
            date: calendar::business_date(now, offset),
            approved_at: now,
            trigger,
        }
    }

    pub fn for_date(date: NaiveDate, now: DateTime<Utc>, trigger: Trigger) -> Self {
        Self {
            date,
            approved_at: now,
            trigger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub date: NaiveDate,
    pub outcome: JobOutcome,
}

impl JobReport {
    pub fn inserted(&self) -> usize {
        match self.outcome {
            JobOutcome::Inserted(n) => n,
            JobOutcome::Holiday | JobOutcome::NothingToDo => 0,
        }
    }

    pub fn message(&self) -> Option<String> {
        match self.outcome {
            JobOutcome::Holiday => {
                Some(format!("{} is a holiday, no absentees marked.", self.date))
            }
            JobOutcome::NothingToDo => Some("No missing attendance records.".to_string()),
            JobOutcome::Inserted(_) => None,
        }
    }
}

/// Marks every tracked employee without an attendance row on `request.date`
/// as absent, unless the date is a holiday.
///
/// All reads finish before the single write, so a failure never leaves a
/// partial batch behind. Re-running for the same date inserts nothing.
#[instrument(
    name = "mark_absentees",
    skip(store, request),
    fields(date = %request.date, trigger = %request.trigger)
)]
pub async fn run(store: &dyn RecordsStore, request: JobRequest) -> Result<JobReport, JobError> {
    let result = run_stages(store, &request).await;

    match &result {
        Ok(report) => info!(outcome = ?report.outcome, "Absentee job finished"),
        Err(e) => error!(error = %e, "Absentee job failed"),
    }
    result
}

async fn run_stages(store: &dyn RecordsStore, request: &JobRequest) -> Result<JobReport, JobError> {
    let date = request.date;

    enter(JobStage::CheckingHoliday);
    if calendar::is_holiday(store, date).await? {
        return Ok(JobReport {
            date,
            outcome: JobOutcome::Holiday,
        });
    }

    enter(JobStage::Fetching);
    let (roster, attended) = futures::try_join!(
        snapshot::active_employees(store),
        snapshot::attendance_ids_for_date(store, date)
    )?;
    debug!(roster = roster.len(), attended = attended.len(), "Snapshots taken");

    enter(JobStage::Resolving);
    let drafts = resolver::resolve(&roster, &attended, date, request.approved_at);
    if drafts.is_empty() {
        return Ok(JobReport {
            date,
            outcome: JobOutcome::NothingToDo,
        });
    }

    enter(JobStage::Writing);
    let inserted = writer::insert_absentees(store, &drafts).await?;

    Ok(JobReport {
        date,
        outcome: JobOutcome::Inserted(inserted),
    })
}
