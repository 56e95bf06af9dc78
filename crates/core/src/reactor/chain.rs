use super::resolver::WorkspaceResolver;
use embark_api::{ApiResult, ArtifactRequest, WorkspaceReader, WorkspaceRepository};
use std::path::PathBuf;
use std::sync::Arc;

/// Consults the reactor first and a caller-supplied workspace reader second.
pub struct ChainedWorkspaceReader {
    reactor: Arc<WorkspaceResolver>,
    fallback: Arc<dyn WorkspaceReader>,
}

impl ChainedWorkspaceReader {
    pub fn new(reactor: Arc<WorkspaceResolver>, fallback: Arc<dyn WorkspaceReader>) -> Self {
        Self { reactor, fallback }
    }
}

impl WorkspaceReader for ChainedWorkspaceReader {
    fn repository(&self) -> WorkspaceRepository {
        let mut repository = self.reactor.identity();
        repository.keys.extend(self.fallback.repository().keys);
        repository
    }

    fn find_artifact(&self, request: &ArtifactRequest) -> ApiResult<Option<PathBuf>> {
        match WorkspaceReader::find_artifact(self.reactor.as_ref(), request)? {
            Some(path) => Ok(Some(path)),
            None => self.fallback.find_artifact(request),
        }
    }

    fn find_versions(&self, request: &ArtifactRequest) -> ApiResult<Vec<String>> {
        let mut versions = self.reactor.find_versions(request)?;
        for version in self.fallback.find_versions(request)? {
            if !versions.contains(&version) {
                versions.push(version);
            }
        }
        Ok(versions)
    }
}
