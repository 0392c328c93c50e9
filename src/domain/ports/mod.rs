use crate::domain::models::{
    appointment::Appointment, appointment_type::AppointmentType, booking_policy::BookingPolicy,
    owner::Owner, schedule::Schedule, schedule_override::ScheduleOverride,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait OwnerRepository: Send + Sync {
    async fn create(&self, owner: &Owner) -> Result<Owner, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Owner>, AppError>;
}

#[async_trait]
pub trait BookingPolicyRepository: Send + Sync {
    async fn create(&self, policy: &BookingPolicy) -> Result<BookingPolicy, AppError>;
    async fn find_by_owner(&self, owner_id: &str) -> Result<Option<BookingPolicy>, AppError>;
    async fn find_by_slug(&self, booking_slug: &str) -> Result<Option<BookingPolicy>, AppError>;
    async fn update(&self, policy: &BookingPolicy) -> Result<BookingPolicy, AppError>;
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn upsert(&self, schedule: &Schedule) -> Result<Schedule, AppError>;
    async fn find_by_owner(&self, owner_id: &str) -> Result<Option<Schedule>, AppError>;
}

#[async_trait]
pub trait ScheduleOverrideRepository: Send + Sync {
    async fn upsert(&self, override_entity: &ScheduleOverride) -> Result<ScheduleOverride, AppError>;
    async fn find_by_date(&self, owner_id: &str, date: NaiveDate) -> Result<Option<ScheduleOverride>, AppError>;
    async fn list_by_range(&self, owner_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<ScheduleOverride>, AppError>;
    async fn delete(&self, owner_id: &str, date: NaiveDate) -> Result<(), AppError>;
}

#[async_trait]
pub trait AppointmentTypeRepository: Send + Sync {
    async fn create(&self, appointment_type: &AppointmentType) -> Result<AppointmentType, AppError>;
    async fn find_by_id(&self, owner_id: &str, id: &str) -> Result<Option<AppointmentType>, AppError>;
    async fn list(&self, owner_id: &str) -> Result<Vec<AppointmentType>, AppError>;
    async fn list_active(&self, owner_id: &str) -> Result<Vec<AppointmentType>, AppError>;
    async fn update(&self, appointment_type: &AppointmentType) -> Result<AppointmentType, AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Insert a new appointment. Loses the race against a concurrent insert
    /// for the same owner/type/start and returns `Conflict` instead.
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, owner_id: &str, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Appointment>, AppError>;
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Appointment>, AppError>;
    /// All non-cancelled appointments whose blocked interval intersects
    /// `[start, end)`.
    async fn list_blocking(&self, owner_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError>;
    async fn update(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn appointment_created(&self, appointment: &Appointment) -> Result<(), AppError>;
    async fn appointment_cancelled(&self, appointment: &Appointment, to_attendee: bool) -> Result<(), AppError>;
}

/// Injected time source so slot computation is testable with a fixed
/// reference instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
