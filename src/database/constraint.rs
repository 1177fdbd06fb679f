//! Helpers for recognising constraint violations reported by Postgres, so
//! services can turn them into the same errors their pre-checks produce.

/// Name of the unique constraint that was violated, if `err` is one.
pub fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    let db_err = err.as_database_error()?;
    if db_err.is_unique_violation() {
        Some(db_err.constraint().unwrap_or_default())
    } else {
        None
    }
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_foreign_key_violation())
        .unwrap_or(false)
}

pub fn is_check_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_check_violation())
        .unwrap_or(false)
}
