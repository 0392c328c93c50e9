use std::sync::Arc;
use crate::domain::ports::{
    AppointmentRepository, AppointmentTypeRepository, BookingPolicyRepository, Clock,
    Notifier, OwnerRepository, ScheduleOverrideRepository, ScheduleRepository,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub owner_repo: Arc<dyn OwnerRepository>,
    pub policy_repo: Arc<dyn BookingPolicyRepository>,
    pub schedule_repo: Arc<dyn ScheduleRepository>,
    pub override_repo: Arc<dyn ScheduleOverrideRepository>,
    pub appointment_type_repo: Arc<dyn AppointmentTypeRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
}
