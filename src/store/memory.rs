use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::{RecordsStore, StoreError};
use crate::model::{AttendanceRecord, Employee, HolidayOverride, NewAttendance};

/// One capability of [`RecordsStore`], used for call counting and fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListActiveEmployees = 0,
    ListAttendanceForDate,
    GetHolidayOverride,
    InsertAttendanceBatch,
    ListHolidayOverrides,
    DeleteHolidayOverrides,
}

const OPS: [StoreOp; 6] = [
    StoreOp::ListActiveEmployees,
    StoreOp::ListAttendanceForDate,
    StoreOp::GetHolidayOverride,
    StoreOp::InsertAttendanceBatch,
    StoreOp::ListHolidayOverrides,
    StoreOp::DeleteHolidayOverrides,
];

#[derive(Default)]
struct Tables {
    employees: Vec<Employee>,
    attendance: Vec<AttendanceRecord>,
    holidays: Vec<HolidayOverride>,
    failing: HashSet<StoreOp>,
}

/// In-process records store.
///
/// Enforces the (employee, date) uniqueness the hosted store has on
/// `attendance`, and rejects a whole batch if any row would violate it.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    calls: [AtomicUsize; 6],
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employee(self, employee: Employee) -> Self {
        self.lock().employees.push(employee);
        self
    }

    pub fn with_attendance(self, row: NewAttendance) -> Self {
        self.lock().attendance.push(AttendanceRecord {
            id: Some(Uuid::new_v4()),
            fields: row,
        });
        self
    }

    pub fn with_holiday(self, holiday: HolidayOverride) -> Self {
        self.lock().holidays.push(holiday);
        self
    }

    /// Makes every later call to `op` fail with [`StoreError::Unavailable`].
    pub fn fail_on(&self, op: StoreOp) {
        self.lock().failing.insert(op);
    }

    pub fn calls(&self, op: StoreOp) -> usize {
        self.calls[op as usize].load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        OPS.iter().map(|op| self.calls(*op)).sum()
    }

    pub fn attendance(&self) -> Vec<AttendanceRecord> {
        self.lock().attendance.clone()
    }

    pub fn holidays(&self) -> Vec<HolidayOverride> {
        self.lock().holidays.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        // a poisoned lock only means another test thread panicked mid-call
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn enter(&self, op: StoreOp) -> Result<std::sync::MutexGuard<'_, Tables>, StoreError> {
        self.calls[op as usize].fetch_add(1, Ordering::SeqCst);
        let tables = self.lock();
        if tables.failing.contains(&op) {
            return Err(StoreError::Unavailable(format!("{:?} failed", op)));
        }
        Ok(tables)
    }
}

#[async_trait]
impl RecordsStore for InMemoryStore {
    async fn list_active_employees(&self) -> Result<Vec<Employee>, StoreError> {
        let tables = self.enter(StoreOp::ListActiveEmployees)?;
        Ok(tables
            .employees
            .iter()
            .filter(|e| e.is_tracked())
            .cloned()
            .collect())
    }

    async fn list_attendance_for_date(&self, date: NaiveDate) -> Result<Vec<Uuid>, StoreError> {
        let tables = self.enter(StoreOp::ListAttendanceForDate)?;
        Ok(tables
            .attendance
            .iter()
            .filter(|r| r.fields.date == date)
            .map(|r| r.fields.employee_id)
            .collect())
    }

    async fn get_holiday_override(
        &self,
        date: NaiveDate,
    ) -> Result<Option<HolidayOverride>, StoreError> {
        let tables = self.enter(StoreOp::GetHolidayOverride)?;
        Ok(tables.holidays.iter().find(|h| h.date == date).cloned())
    }

    async fn insert_attendance_batch(
        &self,
        rows: &[NewAttendance],
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut tables = self.enter(StoreOp::InsertAttendanceBatch)?;

        let mut keys: HashSet<(Uuid, NaiveDate)> = tables
            .attendance
            .iter()
            .map(|r| (r.fields.employee_id, r.fields.date))
            .collect();
        for row in rows {
            if !keys.insert((row.employee_id, row.date)) {
                return Err(StoreError::Conflict(format!(
                    "duplicate key value violates unique constraint (employee_id, date)=({}, {})",
                    row.employee_id, row.date
                )));
            }
        }

        let created: Vec<AttendanceRecord> = rows
            .iter()
            .map(|row| AttendanceRecord {
                id: Some(Uuid::new_v4()),
                fields: row.clone(),
            })
            .collect();
        tables.attendance.extend(created.iter().cloned());
        Ok(created)
    }

    async fn list_holiday_overrides(&self) -> Result<Vec<HolidayOverride>, StoreError> {
        let tables = self.enter(StoreOp::ListHolidayOverrides)?;
        let mut rows = tables.holidays.clone();
        rows.sort_by_key(|h| h.date);
        Ok(rows)
    }

    async fn delete_holiday_overrides(&self, ids: &[Uuid]) -> Result<usize, StoreError> {
        let mut tables = self.enter(StoreOp::DeleteHolidayOverrides)?;
        let before = tables.holidays.len();
        tables
            .holidays
            .retain(|h| h.id.map_or(true, |id| !ids.contains(&id)));
        Ok(before - tables.holidays.len())
    }
}
