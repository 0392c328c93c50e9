use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{
    appointment, appointment_management, appointment_type, booking, health, owner, policy, schedule,
};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Owner provisioning
        .route("/api/v1/owners", post(owner::create_owner))

        // Booking settings
        .route("/api/v1/{owner_id}/policy", get(policy::get_policy).put(policy::update_policy))
        .route("/api/v1/{owner_id}/schedule", get(schedule::get_schedule).put(schedule::put_schedule))
        .route("/api/v1/{owner_id}/overrides", get(schedule::list_overrides).post(schedule::upsert_override))
        .route("/api/v1/{owner_id}/overrides/{date}", delete(schedule::delete_override))

        // Appointment types
        .route("/api/v1/{owner_id}/appointment-types", get(appointment_type::list_appointment_types).post(appointment_type::create_appointment_type))
        .route("/api/v1/{owner_id}/appointment-types/{type_id}", put(appointment_type::update_appointment_type).delete(appointment_type::deactivate_appointment_type))

        // Public booking flow
        .route("/api/v1/book/{slug}", get(booking::get_booking_page).post(booking::create_booking))
        .route("/api/v1/book/{slug}/dates", get(booking::get_bookable_dates))
        .route("/api/v1/book/{slug}/slots", get(booking::get_slots))

        // Attendee self-service
        .route("/api/v1/appointments/manage/{token}", get(appointment_management::get_appointment_by_token))
        .route("/api/v1/appointments/manage/{token}/cancel", post(appointment_management::cancel_appointment_by_token))

        // Owner appointment management
        .route("/api/v1/{owner_id}/appointments", get(appointment::list_appointments).post(appointment::create_manual_appointment))
        .route("/api/v1/{owner_id}/appointments/{appointment_id}", get(appointment::get_appointment).delete(appointment::delete_appointment))
        .route("/api/v1/{owner_id}/appointments/{appointment_id}/confirm", post(appointment::confirm_appointment))
        .route("/api/v1/{owner_id}/appointments/{appointment_id}/cancel", post(appointment::cancel_appointment))
        .route("/api/v1/{owner_id}/appointments/{appointment_id}/complete", post(appointment::complete_appointment))
        .route("/api/v1/{owner_id}/appointments/{appointment_id}/no-show", post(appointment::mark_no_show))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        owner_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
