use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::owner::OwnerId;
use crate::api::dtos::requests::{CancelAppointmentRequest, CreateManualAppointmentRequest};
use crate::domain::models::appointment::{
    Appointment, AppointmentStatus, NewAppointmentParams, BOOKED_VIA_MANUAL,
};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
) -> Result<impl IntoResponse, AppError> {
    let appointments = state.appointment_repo.list_by_owner(&owner_id).await?;
    Ok(Json(appointments))
}

pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Path((_, appointment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = state.appointment_repo.find_by_id(&owner_id, &appointment_id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;
    Ok(Json(appointment))
}

/// Owner-side creation from the dashboard. Skips the notice window and the
/// per-day cap (the owner overrules their own policy) but never overlap.
pub async fn create_manual_appointment(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Json(payload): Json<CreateManualAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let policy = state.policy_repo.find_by_owner(&owner_id).await?
        .ok_or(AppError::Internal)?;
    let appointment_type = state.appointment_type_repo
        .find_by_id(&owner_id, &payload.appointment_type_id).await?
        .ok_or(AppError::NotFound("Appointment type not found".into()))?;

    let tz: Tz = policy.tz();
    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;

    let local_time = if payload.time.contains('T') {
        let dt = DateTime::parse_from_rfc3339(&payload.time)
            .map_err(|_| AppError::Validation("Invalid ISO time format".into()))?;
        dt.with_timezone(&tz).time()
    } else {
        NaiveTime::parse_from_str(&payload.time, "%H:%M")
            .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into()))?
    };

    let start = tz.from_local_datetime(&date.and_time(local_time))
        .single()
        .ok_or(AppError::Validation("Invalid local time (ambiguous or skipped due to DST)".into()))?
        .with_timezone(&Utc);

    let appointment = Appointment::new(NewAppointmentParams {
        owner_id: owner_id.clone(),
        appointment_type_id: appointment_type.id.clone(),
        start,
        duration_minutes: appointment_type.duration_minutes,
        buffer_before_minutes: appointment_type.buffer_before_minutes,
        buffer_after_minutes: appointment_type.buffer_after_minutes,
        attendee_name: payload.name,
        attendee_email: payload.email,
        attendee_phone: payload.phone,
        attendee_company: payload.company,
        notes: payload.notes,
        booked_via: BOOKED_VIA_MANUAL.to_string(),
    });

    let colliding = state.appointment_repo
        .list_blocking(&owner_id, appointment.blocked_from, appointment.blocked_until)
        .await?;
    if colliding.iter().any(|a| a.occupies_calendar()) {
        return Err(AppError::Conflict("Time slot overlaps an existing appointment".into()));
    }

    let created = state.appointment_repo.create(&appointment).await?;
    info!("Appointment created manually: {} for owner {}", created.id, owner_id);

    if let Err(err) = state.notifier.appointment_created(&created).await {
        warn!("Failed to dispatch creation notification for {}: {}", created.id, err);
    }

    Ok(Json(created))
}

async fn transition(
    state: &AppState,
    owner_id: &str,
    appointment_id: &str,
    next: AppointmentStatus,
    cancellation_reason: Option<String>,
) -> Result<Appointment, AppError> {
    let mut appointment = state.appointment_repo.find_by_id(owner_id, appointment_id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    if !appointment.status.can_transition_to(next) {
        return Err(AppError::Conflict(format!(
            "Cannot move appointment from {} to {}",
            appointment.status.as_str(),
            next.as_str()
        )));
    }

    appointment.status = next;
    if next == AppointmentStatus::Cancelled {
        appointment.cancellation_reason = cancellation_reason;
    }

    let updated = state.appointment_repo.update(&appointment).await?;
    info!("Appointment {} moved to {}", updated.id, updated.status.as_str());
    Ok(updated)
}

pub async fn confirm_appointment(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Path((_, appointment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let updated = transition(&state, &owner_id, &appointment_id, AppointmentStatus::Confirmed, None).await?;
    Ok(Json(updated))
}

pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Path((_, appointment_id)): Path<(String, String)>,
    Json(payload): Json<CancelAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = transition(
        &state,
        &owner_id,
        &appointment_id,
        AppointmentStatus::Cancelled,
        payload.reason,
    ).await?;

    if let Err(err) = state.notifier.appointment_cancelled(&updated, true).await {
        warn!("Failed to dispatch cancellation notification for {}: {}", updated.id, err);
    }

    Ok(Json(updated))
}

pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Path((_, appointment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let updated = transition(&state, &owner_id, &appointment_id, AppointmentStatus::Completed, None).await?;
    Ok(Json(updated))
}

pub async fn mark_no_show(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Path((_, appointment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let updated = transition(&state, &owner_id, &appointment_id, AppointmentStatus::NoShow, None).await?;
    Ok(Json(updated))
}

pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Path((_, appointment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let mut appointment = state.appointment_repo.find_by_id(&owner_id, &appointment_id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    // A still-active appointment must leave the unique slot index, otherwise
    // the freed start time could never be rebooked.
    if appointment.occupies_calendar() {
        appointment.status = AppointmentStatus::Cancelled;
    }
    appointment.deleted_at = Some(state.clock.now());

    state.appointment_repo.update(&appointment).await?;
    info!("Appointment soft-deleted: {}", appointment_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
