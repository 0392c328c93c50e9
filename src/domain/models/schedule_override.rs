use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::domain::models::schedule::TimeInterval;

/// Date-specific exception to the weekly schedule: a closure, or replacement
/// open hours. Wins over `WeekSchedule` for its date.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ScheduleOverride {
    pub id: String,
    pub owner_id: String,
    pub date: NaiveDate,
    pub is_closed: bool,
    pub hours_json: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ScheduleOverride {
    pub fn new(owner_id: String, date: NaiveDate, is_closed: bool, hours: Option<&[TimeInterval]>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            date,
            is_closed,
            hours_json: hours.map(|h| serde_json::to_string(h).unwrap_or_else(|_| "[]".to_string())),
            created_at: Utc::now(),
        }
    }

    pub fn hours(&self) -> Option<Vec<TimeInterval>> {
        self.hours_json
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
    }
}
