use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

pub const AUTO_ABSENT_REASON: &str = "Auto-marked absent";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    HalfDay,
    OnLeave,
    Absent,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WorkMode {
    Physical,
    Wfh,
}

/// Insert payload for the `attendance` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAttendance {
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub work_mode: Option<WorkMode>,
    pub reason: Option<String>,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
    pub is_approved: bool,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl NewAttendance {
    /// Pre-approved absence with no approver, as written by the batch job.
    pub fn auto_absent(employee_id: Uuid, date: NaiveDate, approved_at: DateTime<Utc>) -> Self {
        Self {
            employee_id,
            date,
            status: AttendanceStatus::Absent,
            work_mode: None,
            reason: Some(AUTO_ABSENT_REASON.to_string()),
            check_in_time: None,
            check_out_time: None,
            is_approved: true,
            approved_by: None,
            approved_at: Some(approved_at),
        }
    }
}

/// A stored attendance row as returned by the store after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default)]
    pub id: Option<Uuid>,

    #[serde(flatten)]
    pub fields: NewAttendance,
}

/// `select=employee_id` projection of the attendance table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttendanceRef {
    pub employee_id: Uuid,
}
