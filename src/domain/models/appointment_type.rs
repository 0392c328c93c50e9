use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A bookable service. `duration + buffer_before + buffer_after` is the total
/// calendar footprint one appointment of this type consumes.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AppointmentType {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub duration_minutes: i32,
    pub buffer_before_minutes: i32,
    pub buffer_after_minutes: i32,
    pub price_cents: i64,
    pub is_active: bool,
    pub max_per_day: Option<i32>,
    pub require_phone: bool,
    pub require_company: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentTypeParams {
    pub owner_id: String,
    pub name: String,
    pub duration_minutes: i32,
    pub buffer_before_minutes: i32,
    pub buffer_after_minutes: i32,
    pub price_cents: i64,
    pub max_per_day: Option<i32>,
    pub require_phone: bool,
    pub require_company: bool,
    pub sort_order: i32,
}

impl AppointmentType {
    pub fn new(params: NewAppointmentTypeParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: params.owner_id,
            name: params.name,
            duration_minutes: params.duration_minutes,
            buffer_before_minutes: params.buffer_before_minutes,
            buffer_after_minutes: params.buffer_after_minutes,
            price_cents: params.price_cents,
            is_active: true,
            max_per_day: params.max_per_day,
            require_phone: params.require_phone,
            require_company: params.require_company,
            sort_order: params.sort_order,
            created_at: Utc::now(),
        }
    }
}
