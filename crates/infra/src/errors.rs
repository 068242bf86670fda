//! Conversions from external infrastructure errors into domain errors.

use chairside_domain::ClinicError;
use r2d2::Error as PoolError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ClinicError);

impl From<InfraError> for ClinicError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ClinicError> for InfraError {
    fn from(value: ClinicError) -> Self {
        Self(value)
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        use rusqlite::ffi::ErrorCode;

        let mapped = match value {
            SqlError::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => ClinicError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        ClinicError::Database("database is locked".into())
                    }
                    ErrorCode::ConstraintViolation => ClinicError::Database(format!(
                        "constraint violation (code {}): {message}",
                        err.extended_code
                    )),
                    _ => ClinicError::Database(format!(
                        "sqlite failure {:?} (code {}): {message}",
                        err.code, err.extended_code
                    )),
                }
            }
            SqlError::QueryReturnedNoRows => {
                ClinicError::NotFound("no rows returned by query".into())
            }
            SqlError::FromSqlConversionFailure(_, _, cause) => {
                ClinicError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            SqlError::InvalidColumnType(_, name, ty) => {
                ClinicError::Database(format!("invalid column type for {name}: {ty}"))
            }
            other => ClinicError::Database(other.to_string()),
        };
        Self(mapped)
    }
}

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        Self(ClinicError::Database(format!("pool error: {value}")))
    }
}
