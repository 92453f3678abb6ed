//! Access to the hosted records store.
//!
//! The job only ever talks to the store through [`RecordsStore`], so the REST
//! client and the in-memory double are interchangeable.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{AttendanceRecord, Employee, HolidayOverride, NewAttendance};

pub mod memory;
pub mod rest;

pub use memory::InMemoryStore;
pub use rest::RestStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("store returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Row-level uniqueness violation, e.g. a second record for (employee, date).
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RecordsStore: Send + Sync {
    /// Employee-role profiles with `is_active = true`.
    async fn list_active_employees(&self) -> Result<Vec<Employee>, StoreError>;

    /// Employee ids that already have an attendance row on `date`, any status.
    async fn list_attendance_for_date(&self, date: NaiveDate) -> Result<Vec<Uuid>, StoreError>;

    async fn get_holiday_override(
        &self,
        date: NaiveDate,
    ) -> Result<Option<HolidayOverride>, StoreError>;

    /// Inserts all rows or none. Returns the rows the store created.
    async fn insert_attendance_batch(
        &self,
        rows: &[NewAttendance],
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn list_holiday_overrides(&self) -> Result<Vec<HolidayOverride>, StoreError>;

    /// Returns the number of rows removed.
    async fn delete_holiday_overrides(&self, ids: &[Uuid]) -> Result<usize, StoreError>;
}
