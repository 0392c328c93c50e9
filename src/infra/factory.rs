use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::clock::SystemClock;
use crate::infra::notify::webhook_notifier::WebhookNotifier;
use crate::infra::repositories::{
    postgres_appointment_repo::PostgresAppointmentRepo,
    postgres_appointment_type_repo::PostgresAppointmentTypeRepo,
    postgres_owner_repo::PostgresOwnerRepo,
    postgres_policy_repo::PostgresPolicyRepo,
    postgres_schedule_override_repo::PostgresScheduleOverrideRepo,
    postgres_schedule_repo::PostgresScheduleRepo,
    sqlite_appointment_repo::SqliteAppointmentRepo,
    sqlite_appointment_type_repo::SqliteAppointmentTypeRepo,
    sqlite_owner_repo::SqliteOwnerRepo,
    sqlite_policy_repo::SqlitePolicyRepo,
    sqlite_schedule_override_repo::SqliteScheduleOverrideRepo,
    sqlite_schedule_repo::SqliteScheduleRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let notifier = Arc::new(WebhookNotifier::new(
        config.notify_webhook_url.clone(),
        config.notify_webhook_token.clone(),
    ));
    let clock = Arc::new(SystemClock);

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            owner_repo: Arc::new(PostgresOwnerRepo::new(pool.clone())),
            policy_repo: Arc::new(PostgresPolicyRepo::new(pool.clone())),
            schedule_repo: Arc::new(PostgresScheduleRepo::new(pool.clone())),
            override_repo: Arc::new(PostgresScheduleOverrideRepo::new(pool.clone())),
            appointment_type_repo: Arc::new(PostgresAppointmentTypeRepo::new(pool.clone())),
            appointment_repo: Arc::new(PostgresAppointmentRepo::new(pool.clone())),
            notifier,
            clock,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            owner_repo: Arc::new(SqliteOwnerRepo::new(pool.clone())),
            policy_repo: Arc::new(SqlitePolicyRepo::new(pool.clone())),
            schedule_repo: Arc::new(SqliteScheduleRepo::new(pool.clone())),
            override_repo: Arc::new(SqliteScheduleOverrideRepo::new(pool.clone())),
            appointment_type_repo: Arc::new(SqliteAppointmentTypeRepo::new(pool.clone())),
            appointment_repo: Arc::new(SqliteAppointmentRepo::new(pool.clone())),
            notifier,
            clock,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
