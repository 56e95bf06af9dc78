use embark_api::ApiError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbarkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Settings configuration error: {0}")]
    SettingsConfiguration(String),
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] globset::Error),
    #[error("Build cancelled")]
    Cancelled,
    #[error("Invalid engine home {}: {message}", path.display())]
    EngineHome { path: PathBuf, message: String },
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl EmbarkError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EmbarkError::Cancelled | EmbarkError::Api(ApiError::Cancelled))
    }
}

pub type Result<T> = std::result::Result<T, EmbarkError>;
