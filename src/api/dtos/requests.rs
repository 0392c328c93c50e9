use crate::domain::models::schedule::TimeInterval;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateOwnerRequest {
    pub name: String,
    pub email: String,
    pub booking_slug: String,
    pub timezone: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdatePolicyRequest {
    pub timezone: Option<String>,
    pub min_booking_notice_hours: Option<i32>,
    pub max_booking_days_ahead: Option<i32>,
    pub require_approval: Option<bool>,
    pub booking_slug: Option<String>,
    pub is_booking_enabled: Option<bool>,
}

#[derive(Deserialize)]
pub struct OverrideRequest {
    pub date: NaiveDate,
    pub is_closed: bool,
    pub hours: Option<Vec<TimeInterval>>,
}

#[derive(Deserialize)]
pub struct CreateAppointmentTypeRequest {
    pub name: String,
    pub duration_minutes: i32,
    pub buffer_before_minutes: Option<i32>,
    pub buffer_after_minutes: Option<i32>,
    pub price_cents: Option<i64>,
    /// 0 means unlimited.
    pub max_per_day: Option<i32>,
    pub require_phone: Option<bool>,
    pub require_company: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateAppointmentTypeRequest {
    pub name: Option<String>,
    pub duration_minutes: Option<i32>,
    pub buffer_before_minutes: Option<i32>,
    pub buffer_after_minutes: Option<i32>,
    pub price_cents: Option<i64>,
    pub is_active: Option<bool>,
    /// 0 means unlimited.
    pub max_per_day: Option<i32>,
    pub require_phone: Option<bool>,
    pub require_company: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub appointment_type_id: String,
    pub date: String,
    /// "HH:MM" wall-clock in the owner's timezone, or an RFC3339 instant.
    pub time: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateManualAppointmentRequest {
    pub appointment_type_id: String,
    pub date: String,
    pub time: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
}
