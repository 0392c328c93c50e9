use bookwell_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::appointment::Appointment,
    domain::ports::{Clock, Notifier},
    error::AppError,
    infra::repositories::{
        sqlite_appointment_repo::SqliteAppointmentRepo,
        sqlite_appointment_type_repo::SqliteAppointmentTypeRepo,
        sqlite_owner_repo::SqliteOwnerRepo,
        sqlite_policy_repo::SqlitePolicyRepo,
        sqlite_schedule_override_repo::SqliteScheduleOverrideRepo,
        sqlite_schedule_repo::SqliteScheduleRepo,
    },
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Utc};

/// Records dispatched events instead of calling a webhook.
pub struct MockNotifier {
    pub events: Mutex<Vec<(String, bool)>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self { events: Mutex::new(Vec::new()) }
    }

    pub fn recorded(&self) -> Vec<(String, bool)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn appointment_created(&self, appointment: &Appointment) -> Result<(), AppError> {
        self.events.lock().unwrap().push((format!("created:{}", appointment.id), true));
        Ok(())
    }

    async fn appointment_cancelled(&self, appointment: &Appointment, to_attendee: bool) -> Result<(), AppError> {
        self.events.lock().unwrap().push((format!("cancelled:{}", appointment.id), to_attendee));
        Ok(())
    }
}

/// Settable time source so slot math is deterministic in tests.
pub struct MockClock {
    now: Mutex<DateTime<Utc>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self { now: Mutex::new(Utc::now()) }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap() = instant;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub clock: Arc<MockClock>,
    pub notifier: Arc<MockNotifier>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            notify_webhook_url: "http://localhost".to_string(),
            notify_webhook_token: "token".to_string(),
        };

        let clock = Arc::new(MockClock::new());
        let notifier = Arc::new(MockNotifier::new());

        let state = Arc::new(AppState {
            config,
            owner_repo: Arc::new(SqliteOwnerRepo::new(pool.clone())),
            policy_repo: Arc::new(SqlitePolicyRepo::new(pool.clone())),
            schedule_repo: Arc::new(SqliteScheduleRepo::new(pool.clone())),
            override_repo: Arc::new(SqliteScheduleOverrideRepo::new(pool.clone())),
            appointment_type_repo: Arc::new(SqliteAppointmentTypeRepo::new(pool.clone())),
            appointment_repo: Arc::new(SqliteAppointmentRepo::new(pool.clone())),
            notifier: notifier.clone(),
            clock: clock.clone(),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            clock,
            notifier,
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
