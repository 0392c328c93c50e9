use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::CreateOwnerRequest, responses::OwnerCreatedResponse};
use crate::domain::models::{booking_policy::BookingPolicy, owner::Owner, schedule::Schedule};
use crate::domain::services::defaults;
use crate::error::AppError;
use std::sync::Arc;
use chrono_tz::Tz;
use tracing::info;

/// Creates a business owner and provisions their booking settings: a default
/// policy and a Mon-Fri 09:00-17:00 week schedule.
pub async fn create_owner(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOwnerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.booking_slug.trim().is_empty() {
        return Err(AppError::Validation("booking_slug must not be empty".into()));
    }
    if let Some(ref tz) = payload.timezone {
        if tz.parse::<Tz>().is_err() {
            return Err(AppError::Validation("Invalid timezone".into()));
        }
    }

    let owner = Owner::new(payload.name, payload.email);
    let created = state.owner_repo.create(&owner).await?;

    let policy = BookingPolicy::new(created.id.clone(), payload.booking_slug, payload.timezone);
    let created_policy = state.policy_repo.create(&policy).await?;

    let schedule = Schedule::new(created.id.clone(), &defaults::default_week_schedule());
    state.schedule_repo.upsert(&schedule).await?;

    info!("Owner created: {} (slug {})", created.id, created_policy.booking_slug);

    Ok(Json(OwnerCreatedResponse {
        owner_id: created.id,
        booking_slug: created_policy.booking_slug,
    }))
}
