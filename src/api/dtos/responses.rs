use serde::Serialize;

use crate::domain::models::appointment_type::AppointmentType;
use crate::domain::services::availability::TimeSlot;

#[derive(Serialize)]
pub struct OwnerCreatedResponse {
    pub owner_id: String,
    pub booking_slug: String,
}

#[derive(Serialize)]
pub struct BookingPageResponse {
    pub owner_name: String,
    pub timezone: String,
    pub appointment_types: Vec<AppointmentType>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: String,
    pub slots: Vec<TimeSlot>,
}
