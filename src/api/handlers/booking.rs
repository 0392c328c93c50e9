use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::CreateBookingRequest, responses::{BookingPageResponse, SlotsResponse}};
use crate::domain::models::appointment::{Appointment, NewAppointmentParams, BOOKED_VIA_PUBLIC};
use crate::domain::models::booking_policy::BookingPolicy;
use crate::domain::services::availability::calculate_slots;
use crate::domain::services::booking_window::bookable_dates;
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

fn active_policy(policy: BookingPolicy) -> Result<BookingPolicy, AppError> {
    if !policy.is_booking_enabled {
        return Err(AppError::BookingDisabled);
    }
    Ok(policy)
}

fn day_bounds_utc(tz: Tz, date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let start = tz.from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
        .earliest()
        .ok_or_else(|| AppError::Validation("Invalid date for timezone".into()))?;
    let end = tz.from_local_datetime(&date.and_hms_opt(23, 59, 59).unwrap())
        .latest()
        .ok_or_else(|| AppError::Validation("Invalid date for timezone".into()))?;

    Ok((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Accepts "HH:MM" wall-clock in the owner's timezone or a full RFC3339
/// instant, like the booking page sends after a slot refresh.
fn parse_start(tz: Tz, date: NaiveDate, time: &str) -> Result<DateTime<Utc>, AppError> {
    let local_time = if time.contains('T') {
        let dt = DateTime::parse_from_rfc3339(time)
            .map_err(|_| AppError::Validation("Invalid ISO time format".into()))?;
        dt.with_timezone(&tz).time()
    } else {
        NaiveTime::parse_from_str(time, "%H:%M")
            .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into()))?
    };

    tz.from_local_datetime(&date.and_time(local_time))
        .single()
        .ok_or(AppError::Validation("Invalid local time (ambiguous or skipped due to DST)".into()))
        .map(|dt| dt.with_timezone(&Utc))
}

pub async fn get_booking_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let policy = state.policy_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Booking page not found".into()))?;
    let policy = active_policy(policy)?;

    let owner = state.owner_repo.find_by_id(&policy.owner_id).await?
        .ok_or(AppError::Internal)?;
    let types = state.appointment_type_repo.list_active(&policy.owner_id).await?;

    Ok(Json(BookingPageResponse {
        owner_name: owner.name,
        timezone: policy.timezone,
        appointment_types: types,
    }))
}

pub async fn get_bookable_dates(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let policy = state.policy_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Booking page not found".into()))?;
    let policy = active_policy(policy)?;

    let type_id = params.get("type_id").ok_or(AppError::Validation("type_id required".into()))?;
    let appointment_type = state.appointment_type_repo.find_by_id(&policy.owner_id, type_id).await?
        .ok_or(AppError::NotFound("Appointment type not found".into()))?;
    if !appointment_type.is_active {
        return Err(AppError::Validation("Appointment type is not bookable".into()));
    }

    let week = state.schedule_repo.find_by_owner(&policy.owner_id).await?
        .map(|s| s.week())
        .unwrap_or_default();

    let now = state.clock.now();
    let tz = policy.tz();
    let window_start = (now + Duration::hours(policy.min_booking_notice_hours as i64))
        .with_timezone(&tz)
        .date_naive();
    let window_end = (now + Duration::days(policy.max_booking_days_ahead as i64))
        .with_timezone(&tz)
        .date_naive();

    let overrides = state.override_repo.list_by_range(&policy.owner_id, window_start, window_end).await?;

    let dates = bookable_dates(&policy, &week, &overrides, now);
    Ok(Json(dates))
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let policy = state.policy_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Booking page not found".into()))?;
    let policy = active_policy(policy)?;

    let type_id = params.get("type_id").ok_or(AppError::Validation("type_id required".into()))?;
    let appointment_type = state.appointment_type_repo.find_by_id(&policy.owner_id, type_id).await?
        .ok_or(AppError::NotFound("Appointment type not found".into()))?;
    if !appointment_type.is_active {
        return Err(AppError::Validation("Appointment type is not bookable".into()));
    }

    let date_str = params.get("date").ok_or(AppError::Validation("date required".into()))?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;

    let week = state.schedule_repo.find_by_owner(&policy.owner_id).await?
        .map(|s| s.week())
        .unwrap_or_default();
    let override_rule = state.override_repo.find_by_date(&policy.owner_id, date).await?;

    let tz = policy.tz();
    let (day_start, day_end) = day_bounds_utc(tz, date)?;
    let existing = state.appointment_repo.list_blocking(&policy.owner_id, day_start, day_end).await?;

    let slots = calculate_slots(
        &appointment_type,
        &policy,
        &week,
        override_rule.as_ref(),
        &existing,
        date,
        state.clock.now(),
    );

    Ok(Json(SlotsResponse {
        date: date_str.to_string(),
        slots,
    }))
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_booking: Starting for slug {}", slug);

    let policy = state.policy_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Booking page not found".into()))?;
    let policy = active_policy(policy)?;

    let appointment_type = state.appointment_type_repo
        .find_by_id(&policy.owner_id, &payload.appointment_type_id).await?
        .ok_or(AppError::NotFound("Appointment type not found".into()))?;
    if !appointment_type.is_active {
        return Err(AppError::Validation("Appointment type is not bookable".into()));
    }

    if appointment_type.require_phone
        && payload.phone.as_deref().map_or(true, |p| p.trim().is_empty())
    {
        return Err(AppError::Validation("Phone number is required".into()));
    }
    if appointment_type.require_company
        && payload.company.as_deref().map_or(true, |c| c.trim().is_empty())
    {
        return Err(AppError::Validation("Company is required".into()));
    }

    let tz = policy.tz();
    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;
    let start = parse_start(tz, date, &payload.time)?;

    // The client picked from a slot list that may be stale; recompute and
    // require membership before touching the database.
    let week = state.schedule_repo.find_by_owner(&policy.owner_id).await?
        .map(|s| s.week())
        .unwrap_or_default();
    let override_rule = state.override_repo.find_by_date(&policy.owner_id, date).await?;

    let (day_start, day_end) = day_bounds_utc(tz, date)?;
    let existing = state.appointment_repo.list_blocking(&policy.owner_id, day_start, day_end).await?;

    let now = state.clock.now();
    let valid_slots = calculate_slots(
        &appointment_type,
        &policy,
        &week,
        override_rule.as_ref(),
        &existing,
        date,
        now,
    );

    if !valid_slots.iter().any(|s| s.start == start) {
        warn!("Booking rejected: slot {} not available for slug {}", start, slug);
        return Err(AppError::Conflict("Selected time slot is not available".into()));
    }

    let appointment = Appointment::new(NewAppointmentParams {
        owner_id: policy.owner_id.clone(),
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
        booked_via: BOOKED_VIA_PUBLIC.to_string(),
    });

    // The partial unique index on (owner, type, start) serializes concurrent
    // submissions; the loser gets Conflict here.
    let created = state.appointment_repo.create(&appointment).await?;
    info!("Appointment booked: {} for slug {}", created.id, slug);

    // Only after the insert committed, so a rolled-back booking never
    // notifies anyone.
    if let Err(err) = state.notifier.appointment_created(&created).await {
        warn!("Failed to dispatch creation notification for {}: {}", created.id, err);
    }

    Ok(Json(created))
}
