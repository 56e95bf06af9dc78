use crate::error::ApiResult;
use crate::models::ArtifactRequest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

pub const REACTOR_REPOSITORY_TYPE: &str = "reactor";

/// Identity of a workspace reader, distinguishing it from remote repositories
/// in the build engine's bookkeeping.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRepository {
    pub content_type: String,
    /// `group:artifact:version` of every module known when the snapshot was taken.
    pub keys: BTreeSet<String>,
}

impl WorkspaceRepository {
    pub fn new(content_type: impl Into<String>, keys: BTreeSet<String>) -> Self {
        Self {
            content_type: content_type.into(),
            keys,
        }
    }

    pub fn id(&self) -> &str {
        "workspace"
    }
}

/// Resolves artifacts from modules of the current build before any persisted repository is consulted.
pub trait WorkspaceReader: Send + Sync {
    fn repository(&self) -> WorkspaceRepository;

    /// Locate the file for an exact `group:artifact:version` request.
    /// `Ok(None)` means the workspace does not have it.
    fn find_artifact(&self, request: &ArtifactRequest) -> ApiResult<Option<PathBuf>>;

    /// Versions of `group:artifact` that can satisfy the request's extension and classifier.
    fn find_versions(&self, request: &ArtifactRequest) -> ApiResult<Vec<String>>;
}
