use crate::domain::models::appointment::Appointment;
use crate::domain::ports::Notifier;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

/// Posts appointment events to an external notification service. Delivery
/// (email/SMS rendering, retries) is that service's concern.
pub struct WebhookNotifier {
    client: Client,
    webhook_url: String,
    api_token: String,
}

impl WebhookNotifier {
    pub fn new(webhook_url: String, api_token: String) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
            api_token,
        }
    }

    async fn post(&self, payload: &EventPayload<'_>) -> Result<(), AppError> {
        let response = self.client
            .post(&self.webhook_url)
            .bearer_auth(&self.api_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!("Notification webhook unreachable: {}", e);
                AppError::Internal
            })?;

        if !response.status().is_success() {
            error!("Notification webhook rejected event: {}", response.status());
            return Err(AppError::Internal);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct EventPayload<'a> {
    event: &'a str,
    to_attendee: bool,
    appointment: &'a Appointment,
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn appointment_created(&self, appointment: &Appointment) -> Result<(), AppError> {
        self.post(&EventPayload {
            event: "appointment.created",
            to_attendee: true,
            appointment,
        }).await
    }

    async fn appointment_cancelled(&self, appointment: &Appointment, to_attendee: bool) -> Result<(), AppError> {
        self.post(&EventPayload {
            event: "appointment.cancelled",
            to_attendee,
            appointment,
        }).await
    }
}
