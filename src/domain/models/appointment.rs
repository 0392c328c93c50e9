use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

pub const BOOKED_VIA_PUBLIC: &str = "public";
pub const BOOKED_VIA_MANUAL: &str = "manual";

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// scheduled -> confirmed | cancelled | completed | no_show,
    /// confirmed -> cancelled | completed | no_show, terminal states absorb.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        match self {
            Self::Scheduled => next != Self::Scheduled,
            Self::Confirmed => matches!(next, Self::Completed | Self::Cancelled | Self::NoShow),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Appointment {
    pub id: String,
    pub owner_id: String,
    pub appointment_type_id: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    /// `start - buffer_before`, frozen at creation so later edits to the
    /// appointment type never shift an existing footprint.
    pub blocked_from: DateTime<Utc>,
    /// `end + buffer_after`, frozen at creation.
    pub blocked_until: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub attendee_name: String,
    pub attendee_email: String,
    pub attendee_phone: Option<String>,
    pub attendee_company: Option<String>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub confirmation_token: String,
    pub booked_via: String,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub owner_id: String,
    pub appointment_type_id: String,
    pub start: DateTime<Utc>,
    pub duration_minutes: i32,
    pub buffer_before_minutes: i32,
    pub buffer_after_minutes: i32,
    pub attendee_name: String,
    pub attendee_email: String,
    pub attendee_phone: Option<String>,
    pub attendee_company: Option<String>,
    pub notes: Option<String>,
    pub booked_via: String,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        let end = params.start + Duration::minutes(params.duration_minutes as i64);

        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(48)
            .map(char::from)
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: params.owner_id,
            appointment_type_id: params.appointment_type_id,
            start_datetime: params.start,
            end_datetime: end,
            blocked_from: params.start - Duration::minutes(params.buffer_before_minutes as i64),
            blocked_until: end + Duration::minutes(params.buffer_after_minutes as i64),
            status: AppointmentStatus::Scheduled,
            attendee_name: params.attendee_name,
            attendee_email: params.attendee_email,
            attendee_phone: params.attendee_phone,
            attendee_company: params.attendee_company,
            notes: params.notes,
            cancellation_reason: None,
            confirmation_token: token,
            booked_via: params.booked_via,
            deleted_at: None,
            created_at: Utc::now(),
        }
    }

    /// Whether this appointment's blocked interval still excludes other
    /// bookings from the calendar.
    pub fn occupies_calendar(&self) -> bool {
        self.deleted_at.is_none()
            && matches!(self.status, AppointmentStatus::Scheduled | AppointmentStatus::Confirmed)
    }
}
