use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sqlx::FromRow;

use crate::domain::services::defaults;

/// Owner-level constraints for the public booking page. Exactly one row per
/// owner; `booking_slug` is the public URL handle and is unique across owners.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BookingPolicy {
    pub id: String,
    pub owner_id: String,
    pub timezone: String,
    pub min_booking_notice_hours: i32,
    pub max_booking_days_ahead: i32,
    pub require_approval: bool,
    pub booking_slug: String,
    pub is_booking_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl BookingPolicy {
    pub fn new(owner_id: String, booking_slug: String, timezone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            timezone: timezone.unwrap_or_else(|| defaults::DEFAULT_TIMEZONE.to_string()),
            min_booking_notice_hours: defaults::DEFAULT_MIN_NOTICE_HOURS,
            max_booking_days_ahead: defaults::DEFAULT_MAX_DAYS_AHEAD,
            require_approval: false,
            booking_slug,
            is_booking_enabled: true,
            created_at: Utc::now(),
        }
    }

    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }
}
