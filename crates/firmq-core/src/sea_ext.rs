use sea_orm::{DbErr, SqlErr};

/// Whether a store error is a unique-constraint violation (duplicate key).
///
/// Classified from the driver's typed error, never from message text.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
