#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use hrm_attendance::model::{AttendanceStatus, Employee, NewAttendance, Role, WorkMode};
use uuid::Uuid;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn employee(role: Role, is_active: bool) -> Employee {
    let id = Uuid::new_v4();
    Employee {
        id,
        email: Some(format!("{}@company.test", id)),
        full_name: None,
        role,
        is_active,
    }
}

pub fn active_employee() -> Employee {
    employee(Role::Employee, true)
}

pub fn present(employee_id: Uuid, date: NaiveDate) -> NewAttendance {
    NewAttendance {
        employee_id,
        date,
        status: AttendanceStatus::Present,
        work_mode: Some(WorkMode::Physical),
        reason: None,
        check_in_time: None,
        check_out_time: None,
        is_approved: false,
        approved_by: None,
        approved_at: None,
    }
}

pub fn absent(employee_id: Uuid, date: NaiveDate) -> NewAttendance {
    NewAttendance::auto_absent(employee_id, date, Utc::now())
}
