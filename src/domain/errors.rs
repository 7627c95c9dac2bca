use thiserror::Error;

use super::models::StepId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown step '{0}'")]
    UnknownStep(String),
    #[error("no schema registered for step '{0}'")]
    SchemaNotFound(StepId),
    #[error("field '{name}' is defined twice in step '{step}'")]
    DuplicateField { step: StepId, name: String },
}

impl FormError {
    /// Whether the error means a step's fields cannot be shown.
    pub fn is_schema_load_error(&self) -> bool {
        matches!(self, FormError::UnknownStep(_) | FormError::SchemaNotFound(_))
    }
}

pub type FormResult<T> = Result<T, FormError>;
