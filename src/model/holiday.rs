use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Explicit per-date calendar entry. At most one row per date.
///
/// `is_holiday = false` on a default non-working day turns it into a working day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidayOverride {
    #[serde(default)]
    pub id: Option<Uuid>,

    pub date: NaiveDate,

    pub is_holiday: bool,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl HolidayOverride {
    pub fn new(date: NaiveDate, is_holiday: bool) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            date,
            is_holiday,
            name: None,
            description: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}
