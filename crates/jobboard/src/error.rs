//! Error types for jobboard

use std::error::Error as _;

use thiserror::Error;

use crate::value::BindError;

/// Result type alias for jobboard operations
pub type JobResult<T> = Result<T, JobError>;

/// Error types for job storage operations
#[derive(Debug, Error)]
pub enum JobError {
    /// Caller supplied unusable input (e.g. an empty update)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl JobError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a bad request error
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// HTTP status code an API layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::ForeignKeyViolation(_) | Self::CheckViolation(_) => 400,
            Self::NotFound(_) => 404,
            Self::UniqueViolation(_) => 409,
            _ => 500,
        }
    }

    /// Whether the caller caused this error. Client errors are not system faults
    /// and should not be logged as such.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Parse a tokio_postgres error into a more specific JobError
    ///
    /// A parameter that failed to encode with [`BindError`] is the caller's
    /// input, so it becomes `BadRequest`.
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(bind) = err.source().and_then(|cause| cause.downcast_ref::<BindError>()) {
            return Self::BadRequest(bind.to_string());
        }

        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for JobError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_map_to_4xx() {
        assert_eq!(JobError::bad_request("No data").status_code(), 400);
        assert_eq!(JobError::not_found("No job: 7").status_code(), 404);
        assert_eq!(JobError::UniqueViolation("jobs_pkey: dup".into()).status_code(), 409);
        assert_eq!(JobError::CheckViolation("jobs_salary_check: x".into()).status_code(), 400);
        assert!(JobError::bad_request("No data").is_client_error());
        assert!(JobError::not_found("No job: 7").is_client_error());
    }

    #[test]
    fn system_faults_map_to_500() {
        let err = JobError::Config("DATABASE_URL must be set".into());
        assert_eq!(err.status_code(), 500);
        assert!(!err.is_client_error());
        assert_eq!(JobError::decode("salary", "bad int").status_code(), 500);
    }

    #[test]
    fn display_includes_kind_and_message() {
        assert_eq!(JobError::bad_request("No data").to_string(), "Bad request: No data");
        assert_eq!(
            JobError::decode("equity", "invalid numeric").to_string(),
            "Decode error on column 'equity': invalid numeric"
        );
    }
}
