use thiserror::Error;

/// Message returned to callers for any store or internal failure.
pub const GENERIC_STORE_ERROR: &str = "Database connection error. Please try again.";

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ClinicError {
    /// Whether the failure belongs to the server rather than the request.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ClinicError::Database(_) | ClinicError::Internal(_))
    }

    /// The message safe to show to a caller.
    ///
    /// Client errors carry their own explanation; server errors collapse to
    /// [`GENERIC_STORE_ERROR`] so store details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            ClinicError::Unauthorized(_) => "Unauthorized".to_string(),
            ClinicError::Validation(msg)
            | ClinicError::Conflict(msg)
            | ClinicError::NotFound(msg) => msg.clone(),
            ClinicError::Database(_) | ClinicError::Internal(_) => {
                GENERIC_STORE_ERROR.to_string()
            }
        }
    }
}

pub type ClinicResult<T> = Result<T, ClinicError>;
