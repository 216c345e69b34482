//! Error kinds surfaced by the storage and domain layers.
//!
//! Every core operation returns [`Result<T>`]; the shell decides how each kind
//! is shown to the user. Nothing in the backend terminates the process.

/// Errors produced by record storage and account operations
#[derive(Debug, thiserror::Error)]
pub enum StudentRecordsError {
    /// A required field was missing, or a record had the wrong shape
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A lookup by student identifier found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials did not match
    #[error("Invalid credentials")]
    Auth,

    /// No unused student identifier was found within the attempt budget
    #[error("Could not allocate a unique student ID after {0} attempts")]
    IdSpaceExhausted(u32),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl StudentRecordsError {
    /// Build a validation error for a required field that was left empty
    pub fn missing_field(field: &str) -> Self {
        StudentRecordsError::Validation(format!("{} cannot be empty", field))
    }
}

pub type Result<T> = std::result::Result<T, StudentRecordsError>;
