use std::io::Write;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::error;

use crate::job::calendar::{self, DecisionSource};
use crate::job::prune::prune_saturday_overrides;
use crate::job::{self, JobOutcome, JobRequest, Trigger};
use crate::store::RecordsStore;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

#[derive(Parser)]
#[command(name = "hrm-attendance", version, about = "Absentee auto-marking for the HRM attendance tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the scheduled HTTP trigger
    Serve,
    #[command(flatten)]
    Job(JobCommand),
}

/// One-shot commands that run against the records store and exit.
#[derive(Debug, Clone, Subcommand)]
pub enum JobCommand {
    /// Mark absentees once and exit
    MarkAbsentees {
        /// Business date to process (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show whether a date is a working day, without writing anything
    CheckDate {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete holiday overrides that fall on a Saturday
    PruneSaturdayOverrides {
        #[arg(long)]
        dry_run: bool,
    },
}

/// Runs a one-shot command and returns the process exit status.
///
/// Human-readable results go to `out`, failures to `err`. Every completed
/// outcome (holiday, nothing to do, rows inserted) exits with status 0.
pub async fn run<O: Write, E: Write>(
    command: JobCommand,
    store: &dyn RecordsStore,
    offset: FixedOffset,
    now: DateTime<Utc>,
    out: &mut O,
    err: &mut E,
) -> u8 {
    match execute(command, store, offset, now, out).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Command failed");
            // nothing more to report if stderr itself is gone
            let _ = writeln!(err, "Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

pub async fn execute<O: Write>(
    command: JobCommand,
    store: &dyn RecordsStore,
    offset: FixedOffset,
    now: DateTime<Utc>,
    out: &mut O,
) -> anyhow::Result<()> {
    match command {
        JobCommand::MarkAbsentees { date } => {
            let request = match date {
                Some(date) => JobRequest::for_date(date, now, Trigger::Manual),
                None => JobRequest::at(now, offset, Trigger::Manual),
            };

            writeln!(out, "Marking absentees for date {}...", request.date)?;
            let report = job::run(store, request).await?;
            match report.outcome {
                JobOutcome::Holiday => {
                    writeln!(out, "{} is a holiday, skipping absentee marking.", report.date)?
                }
                JobOutcome::NothingToDo => writeln!(out, "No missing attendance records, nothing to do.")?,
                JobOutcome::Inserted(n) => writeln!(out, "Inserted {} absent records.", n)?,
            }
        }
        JobCommand::CheckDate { date } => {
            let date = date.unwrap_or_else(|| calendar::business_date(now, offset));
            let decision = calendar::decide(store, date).await?;

            let kind = if decision.is_holiday { "holiday" } else { "working day" };
            let source = match &decision.source {
                DecisionSource::Override { name: Some(name) } => format!("override \"{}\"", name),
                DecisionSource::Override { name: None } => "override".to_string(),
                DecisionSource::DefaultWeekly => "default weekly pattern".to_string(),
            };
            writeln!(out, "{} ({}): {} ({})", date, date.weekday(), kind, source)?;

            if decision.source == DecisionSource::DefaultWeekly
                && !decision.is_holiday
                && calendar::is_display_weekend(date)
            {
                writeln!(
                    out,
                    "Note: calendar views show this day as a weekend, but absentees are still marked."
                )?;
            }
        }
        JobCommand::PruneSaturdayOverrides { dry_run } => {
            let report = prune_saturday_overrides(store, dry_run).await?;
            if report.found == 0 {
                writeln!(out, "No Saturday holiday records found.")?;
            } else if dry_run {
                writeln!(
                    out,
                    "Found {} Saturday holiday record(s), dry run: nothing deleted.",
                    report.found
                )?;
            } else {
                writeln!(out, "Deleted {} Saturday holiday record(s).", report.deleted)?;
            }
        }
    }
    Ok(())
}
