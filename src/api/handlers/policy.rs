use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::owner::OwnerId;
use crate::api::dtos::requests::UpdatePolicyRequest;
use crate::error::AppError;
use std::sync::Arc;
use chrono_tz::Tz;
use tracing::info;

pub async fn get_policy(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
) -> Result<impl IntoResponse, AppError> {
    let policy = state.policy_repo.find_by_owner(&owner_id).await?
        .ok_or(AppError::NotFound("Booking policy not found".into()))?;
    Ok(Json(policy))
}

pub async fn update_policy(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    Json(payload): Json<UpdatePolicyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut policy = state.policy_repo.find_by_owner(&owner_id).await?
        .ok_or(AppError::NotFound("Booking policy not found".into()))?;

    if let Some(tz) = payload.timezone {
        if tz.parse::<Tz>().is_err() {
            return Err(AppError::Validation("Invalid timezone".into()));
        }
        policy.timezone = tz;
    }
    if let Some(hours) = payload.min_booking_notice_hours {
        if hours < 0 {
            return Err(AppError::Validation("min_booking_notice_hours must be >= 0".into()));
        }
        policy.min_booking_notice_hours = hours;
    }
    if let Some(days) = payload.max_booking_days_ahead {
        if days < 1 {
            return Err(AppError::Validation("max_booking_days_ahead must be >= 1".into()));
        }
        policy.max_booking_days_ahead = days;
    }
    if let Some(val) = payload.require_approval {
        policy.require_approval = val;
    }
    if let Some(slug) = payload.booking_slug {
        if slug.trim().is_empty() {
            return Err(AppError::Validation("booking_slug must not be empty".into()));
        }
        policy.booking_slug = slug;
    }
    if let Some(val) = payload.is_booking_enabled {
        policy.is_booking_enabled = val;
    }

    let updated = state.policy_repo.update(&policy).await?;
    info!("Booking policy updated for owner {}", owner_id);
    Ok(Json(updated))
}
