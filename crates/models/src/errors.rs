use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl ModelError {
    pub fn required(field: &str) -> Self { Self::Validation(format!("{field} is required")) }
}
