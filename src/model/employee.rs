use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;

/// A row of the `profiles` table. Read-only to the absentee job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub full_name: Option<String>,

    pub role: Role,

    pub is_active: bool,
}

impl Employee {
    /// Only active, employee-role profiles are tracked for attendance.
    pub fn is_tracked(&self) -> bool {
        self.is_active && self.role == Role::Employee
    }
}
