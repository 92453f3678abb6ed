pub mod calendar;
pub mod prune;
pub mod resolver;
pub mod runner;
pub mod snapshot;
pub mod writer;

pub use runner::{JobOutcome, JobReport, JobRequest, Trigger, run};
