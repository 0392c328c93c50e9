use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveTime, Timelike, Utc, Weekday};
use sqlx::FromRow;

/// A single open window within a day, wall-clock "HH:MM" in the owner's
/// timezone. `end` is exclusive.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimeInterval {
    pub start: String,
    pub end: String,
}

impl TimeInterval {
    /// Minute-of-day offsets for both bounds. "23:59" is widened to midnight
    /// so an all-day window does not lose its final slot.
    pub fn minute_bounds(&self) -> Option<(u32, u32)> {
        let start = NaiveTime::parse_from_str(&self.start, "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(&self.end, "%H:%M").ok()?;

        let start_min = start.hour() * 60 + start.minute();
        let mut end_min = end.hour() * 60 + end.minute();
        if end_min == 1439 {
            end_min = 1440;
        }
        Some((start_min, end_min))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DayHours {
    pub is_open: bool,
    pub intervals: Vec<TimeInterval>,
}

/// Recurring weekly availability. Invariant (enforced by `validate`):
/// intervals within a day are well-formed, ascending and non-overlapping.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct WeekSchedule {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl WeekSchedule {
    pub fn for_weekday(&self, weekday: Weekday) -> &DayHours {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let days = [
            ("monday", &self.monday),
            ("tuesday", &self.tuesday),
            ("wednesday", &self.wednesday),
            ("thursday", &self.thursday),
            ("friday", &self.friday),
            ("saturday", &self.saturday),
            ("sunday", &self.sunday),
        ];

        for (name, day) in days {
            validate_intervals(name, &day.intervals)?;
        }
        Ok(())
    }
}

pub fn validate_intervals(day: &str, intervals: &[TimeInterval]) -> Result<(), String> {
    let mut previous_end: Option<u32> = None;

    for interval in intervals {
        let (start, end) = interval
            .minute_bounds()
            .ok_or_else(|| format!("{}: times must be HH:MM", day))?;

        if start >= end {
            return Err(format!("{}: interval {}-{} is empty", day, interval.start, interval.end));
        }
        if let Some(prev) = previous_end {
            if start < prev {
                return Err(format!("{}: intervals overlap or are out of order", day));
            }
        }
        previous_end = Some(end);
    }
    Ok(())
}

/// Persisted weekly availability of one owner. The week itself is stored as
/// JSON, same shape the dashboard edits.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Schedule {
    pub id: String,
    pub owner_id: String,
    pub week_json: String,
    pub created_at: DateTime<Utc>,
}

impl Schedule {
    pub fn new(owner_id: String, week: &WeekSchedule) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            week_json: serde_json::to_string(week).unwrap_or_else(|_| "{}".to_string()),
            created_at: Utc::now(),
        }
    }

    pub fn week(&self) -> WeekSchedule {
        serde_json::from_str(&self.week_json).unwrap_or_default()
    }
}
