use thiserror::Error;

/// Errors that can occur when mutating the form store.
///
/// All variants are recoverable and synchronous: they are returned to the
/// caller of the failing action, and no error path leaves the schema in a
/// partially applied state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No field with the given id exists in the schema
    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// Insertion or move index outside the valid range
    #[error("insertion index {index} out of range 0..={max}")]
    InvalidInsertionIndex { index: usize, max: usize },

    /// A change would leave a field in an inconsistent state
    #[error("invalid field state: {0}")]
    InvalidFieldState(String),

    /// No template with the given id exists in the catalog
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// A template failed validation before application
    #[error("invalid template schema: {0}")]
    InvalidTemplateSchema(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
