use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::owner::OwnerId;
use crate::api::dtos::requests::{CreateAppointmentTypeRequest, UpdateAppointmentTypeRequest};
use crate::domain::models::appointment_type::{AppointmentType, NewAppointmentTypeParams};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

fn check_durations(duration: i32, buffer_before: i32, buffer_after: i32) -> Result<(), AppError> {
    if duration <= 0 {
        return Err(AppError::Validation("duration_minutes must be > 0".into()));
    }
    if buffer_before < 0 || buffer_after < 0 {
        return Err(AppError::Validation("buffers must be >= 0".into()));
    }
    Ok(())
}

fn normalize_cap(max_per_day: Option<i32>) -> Result<Option<i32>, AppError> {
    match max_per_day {
        Some(cap) if cap < 0 => Err(AppError::Validation("max_per_day must be >= 0".into())),
        Some(0) => Ok(None),
        other => Ok(other),
    }
}

pub async fn create_appointment_type(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Json(payload): Json<CreateAppointmentTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let buffer_before = payload.buffer_before_minutes.unwrap_or(0);
    let buffer_after = payload.buffer_after_minutes.unwrap_or(0);
    check_durations(payload.duration_minutes, buffer_before, buffer_after)?;

    let appointment_type = AppointmentType::new(NewAppointmentTypeParams {
        owner_id: owner_id.clone(),
        name: payload.name,
        duration_minutes: payload.duration_minutes,
        buffer_before_minutes: buffer_before,
        buffer_after_minutes: buffer_after,
        price_cents: payload.price_cents.unwrap_or(0),
        max_per_day: normalize_cap(payload.max_per_day)?,
        require_phone: payload.require_phone.unwrap_or(false),
        require_company: payload.require_company.unwrap_or(false),
        sort_order: payload.sort_order.unwrap_or(0),
    });

    let created = state.appointment_type_repo.create(&appointment_type).await?;
    info!("Appointment type created: {} for owner {}", created.id, owner_id);
    Ok(Json(created))
}

pub async fn list_appointment_types(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
) -> Result<impl IntoResponse, AppError> {
    let types = state.appointment_type_repo.list(&owner_id).await?;
    Ok(Json(types))
}

pub async fn update_appointment_type(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Path((_, type_id)): Path<(String, String)>,
    Json(payload): Json<UpdateAppointmentTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut appointment_type = state.appointment_type_repo.find_by_id(&owner_id, &type_id).await?
        .ok_or(AppError::NotFound("Appointment type not found".into()))?;

    if let Some(val) = payload.name { appointment_type.name = val; }
    if let Some(val) = payload.duration_minutes { appointment_type.duration_minutes = val; }
    if let Some(val) = payload.buffer_before_minutes { appointment_type.buffer_before_minutes = val; }
    if let Some(val) = payload.buffer_after_minutes { appointment_type.buffer_after_minutes = val; }
    if let Some(val) = payload.price_cents { appointment_type.price_cents = val; }
    if let Some(val) = payload.is_active { appointment_type.is_active = val; }
    if payload.max_per_day.is_some() {
        appointment_type.max_per_day = normalize_cap(payload.max_per_day)?;
    }
    if let Some(val) = payload.require_phone { appointment_type.require_phone = val; }
    if let Some(val) = payload.require_company { appointment_type.require_company = val; }
    if let Some(val) = payload.sort_order { appointment_type.sort_order = val; }

    check_durations(
        appointment_type.duration_minutes,
        appointment_type.buffer_before_minutes,
        appointment_type.buffer_after_minutes,
    )?;

    let updated = state.appointment_type_repo.update(&appointment_type).await?;
    info!("Appointment type updated: {}", type_id);
    Ok(Json(updated))
}

/// Appointment types are never hard-deleted while appointments reference
/// them; delete deactivates instead.
pub async fn deactivate_appointment_type(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Path((_, type_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let mut appointment_type = state.appointment_type_repo.find_by_id(&owner_id, &type_id).await?
        .ok_or(AppError::NotFound("Appointment type not found".into()))?;

    appointment_type.is_active = false;
    state.appointment_type_repo.update(&appointment_type).await?;
    info!("Appointment type deactivated: {}", type_id);
    Ok(Json(serde_json::json!({"status": "deactivated"})))
}
