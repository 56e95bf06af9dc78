pub mod error;
pub mod models;
pub mod reader;
pub mod workspace;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use models::*;
pub use reader::{ArtifactHandlers, ProjectReader, SettingsLoader};
pub use workspace::{REACTOR_REPOSITORY_TYPE, WorkspaceReader, WorkspaceRepository};
