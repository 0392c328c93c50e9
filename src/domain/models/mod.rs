pub mod appointment;
pub mod appointment_type;
pub mod booking_policy;
pub mod owner;
pub mod schedule;
pub mod schedule_override;
