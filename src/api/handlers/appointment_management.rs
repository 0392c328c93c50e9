use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CancelAppointmentRequest;
use crate::domain::models::appointment::AppointmentStatus;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

/// Attendee self-service via the confirmation token from the booking email.
pub async fn get_appointment_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = state.appointment_repo.find_by_token(&token).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    let appointment_type = state.appointment_type_repo
        .find_by_id(&appointment.owner_id, &appointment.appointment_type_id).await?
        .ok_or(AppError::Internal)?;

    Ok(Json(serde_json::json!({
        "appointment": appointment,
        "appointment_type": appointment_type
    })))
}

pub async fn cancel_appointment_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Json(payload): Json<CancelAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut appointment = state.appointment_repo.find_by_token(&token).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    if appointment.status == AppointmentStatus::Cancelled {
        return Ok(Json(appointment));
    }
    if !appointment.status.can_transition_to(AppointmentStatus::Cancelled) {
        return Err(AppError::Conflict("Appointment can no longer be cancelled".into()));
    }

    appointment.status = AppointmentStatus::Cancelled;
    appointment.cancellation_reason = payload.reason;

    let cancelled = state.appointment_repo.update(&appointment).await?;
    info!("Appointment cancelled via confirmation token: {}", cancelled.id);

    if let Err(err) = state.notifier.appointment_cancelled(&cancelled, false).await {
        warn!("Failed to dispatch cancellation notification for {}: {}", cancelled.id, err);
    }

    Ok(Json(cancelled))
}
