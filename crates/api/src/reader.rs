use crate::error::ApiResult;
use crate::models::{ProjectBuildingRequest, ProjectDescriptor, Settings};
use std::path::Path;

/// Turns a descriptor file into a [`ProjectDescriptor`].
pub trait ProjectReader: Send + Sync {
    fn read(&self, file: &Path, request: &ProjectBuildingRequest) -> ApiResult<ProjectDescriptor>;
}

/// Supplies raw settings content.
pub trait SettingsLoader: Send + Sync {
    /// `Ok(None)` when the file does not exist. A file that exists but cannot
    /// be parsed is an `ApiError::SettingsParse`.
    fn load(&self, path: &Path) -> ApiResult<Option<Settings>>;
}

/// Maps a packaging to the file extension of the artifact it produces.
pub trait ArtifactHandlers: Send + Sync {
    fn extension(&self, packaging: &str) -> Option<String>;
}
