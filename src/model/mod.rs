pub mod attendance;
pub mod employee;
pub mod holiday;
pub mod role;

pub use attendance::{AttendanceRecord, AttendanceRef, AttendanceStatus, NewAttendance, WorkMode};
pub use employee::Employee;
pub use holiday::HolidayOverride;
pub use role::Role;
