use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::owner::OwnerId;
use crate::api::dtos::requests::OverrideRequest;
use crate::domain::models::schedule::{validate_intervals, Schedule, WeekSchedule};
use crate::domain::models::schedule_override::ScheduleOverride;
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::NaiveDate;
use tracing::info;

pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
) -> Result<impl IntoResponse, AppError> {
    let schedule = state.schedule_repo.find_by_owner(&owner_id).await?
        .ok_or(AppError::NotFound("Schedule not found".into()))?;
    Ok(Json(schedule.week()))
}

pub async fn put_schedule(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Json(week): Json<WeekSchedule>,
) -> Result<impl IntoResponse, AppError> {
    week.validate().map_err(AppError::Validation)?;

    let schedule = Schedule::new(owner_id.clone(), &week);
    let saved = state.schedule_repo.upsert(&schedule).await?;
    info!("Schedule updated for owner {}", owner_id);
    Ok(Json(saved.week()))
}

pub async fn upsert_override(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Json(payload): Json<OverrideRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(ref hours) = payload.hours {
        validate_intervals("override", hours).map_err(AppError::Validation)?;
    }

    let entity = ScheduleOverride::new(
        owner_id.clone(),
        payload.date,
        payload.is_closed,
        payload.hours.as_deref(),
    );

    let saved = state.override_repo.upsert(&entity).await?;
    info!("Upserted schedule override for owner {} on {}", owner_id, payload.date);
    Ok(Json(saved))
}

pub async fn list_overrides(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let start_str = params.get("start").ok_or(AppError::Validation("start required".into()))?;
    let end_str = params.get("end").ok_or(AppError::Validation("end required".into()))?;

    let start = NaiveDate::parse_from_str(start_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid start".into()))?;
    let end = NaiveDate::parse_from_str(end_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid end".into()))?;

    let overrides = state.override_repo.list_by_range(&owner_id, start, end).await?;
    Ok(Json(overrides))
}

pub async fn delete_override(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Path((_, date_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date".into()))?;

    state.override_repo.delete(&owner_id, date).await?;
    info!("Deleted schedule override for owner {} on {}", owner_id, date_str);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
