pub mod postgres_appointment_repo;
pub mod postgres_appointment_type_repo;
pub mod postgres_owner_repo;
pub mod postgres_policy_repo;
pub mod postgres_schedule_override_repo;
pub mod postgres_schedule_repo;
pub mod sqlite_appointment_repo;
pub mod sqlite_appointment_type_repo;
pub mod sqlite_owner_repo;
pub mod sqlite_policy_repo;
pub mod sqlite_schedule_override_repo;
pub mod sqlite_schedule_repo;

use crate::error::AppError;

/// Maps a unique-index violation on insert to `Conflict` so a lost booking
/// race surfaces as HTTP 409 instead of a generic database error.
///
/// 2067 = SQLite unique constraint, 23505 = PostgreSQL unique violation.
pub(crate) fn map_unique_violation(e: sqlx::Error, message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        let code = db_err.code().unwrap_or_default();
        if code == "2067" || code == "23505" {
            return AppError::Conflict(message.to_string());
        }
    }
    AppError::Database(e)
}
