use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Missing required field `{field}` in {context}")]
    MissingField {
        field: &'static str,
        context: &'static str,
    },
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("Failed to parse settings {}: {message}", path.display())]
    SettingsParse { path: PathBuf, message: String },
    #[error("Failed to read project {}: {message}", path.display())]
    ProjectRead { path: PathBuf, message: String },
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn missing(field: &'static str, context: &'static str) -> Self {
        ApiError::MissingField { field, context }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
