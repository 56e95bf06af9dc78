use super::index::CoordinateIndex;
use super::matcher::{ArtifactLocation, ArtifactMatcher};
use embark_api::{
    ApiResult, ArtifactHandlers, ArtifactRequest, Coordinate, ProjectDescriptor,
    REACTOR_REPOSITORY_TYPE, WorkspaceReader, WorkspaceRepository,
};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Answers artifact lookups from the modules of the running reactor.
///
/// The index is the only mutable state and sits behind a single lock, so a
/// registration is visible to every lookup issued after it returns and a
/// lookup never sees half of one. Lookups share the read side.
#[derive(Debug)]
pub struct WorkspaceResolver {
    index: RwLock<CoordinateIndex>,
    matcher: ArtifactMatcher,
}

impl WorkspaceResolver {
    pub fn new(handlers: Arc<dyn ArtifactHandlers>) -> Self {
        Self::with_matcher(ArtifactMatcher::new(handlers))
    }

    pub fn with_matcher(matcher: ArtifactMatcher) -> Self {
        Self {
            index: RwLock::new(CoordinateIndex::new()),
            matcher,
        }
    }

    pub fn matcher(&self) -> &ArtifactMatcher {
        &self.matcher
    }

    /// Add a module, replacing any earlier descriptor with the same coordinate.
    pub fn register_project(&self, descriptor: ProjectDescriptor) -> Arc<ProjectDescriptor> {
        let descriptor = Arc::new(descriptor);
        let previous = self.write().register(Arc::clone(&descriptor));
        debug!(
            coordinate = %descriptor.coordinate(),
            replaced = previous.is_some(),
            "Registered reactor project"
        );
        descriptor
    }

    /// Resolve an exact `group:artifact:version` request.
    ///
    /// Never matches across versions. A request without a version is a contract violation.
    pub fn find_artifact(&self, request: &ArtifactRequest) -> ApiResult<Option<ArtifactLocation>> {
        let coordinate = request.coordinate()?;
        let descriptor = self.project(&coordinate);

        let location = descriptor.and_then(|d| self.matcher.find(&d, request));
        debug!(request = %request, found = location.is_some(), "Reactor artifact lookup");
        Ok(location)
    }

    /// Versions of `group:artifact` whose module has an artifact matching the
    /// request's extension and classifier. The request's version is ignored.
    pub fn find_versions(&self, request: &ArtifactRequest) -> ApiResult<Vec<String>> {
        request.require_versionless()?;
        let candidates: Vec<Arc<ProjectDescriptor>> = self
            .read()
            .lookup_all_versions(&request.group_id, &request.artifact_id)
            .to_vec();

        Ok(candidates
            .iter()
            .filter(|d| self.matcher.find(d, request).is_some())
            .map(|d| d.version.clone())
            .collect())
    }

    pub fn project(&self, coordinate: &Coordinate) -> Option<Arc<ProjectDescriptor>> {
        self.read()
            .lookup_exact(
                &coordinate.group_id,
                &coordinate.artifact_id,
                &coordinate.version,
            )
            .cloned()
    }

    /// Stable identity plus the coordinates known right now.
    pub fn identity(&self) -> WorkspaceRepository {
        let keys = self
            .read()
            .coordinates()
            .map(ToString::to_string)
            .collect();
        WorkspaceRepository::new(REACTOR_REPOSITORY_TYPE, keys)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, CoordinateIndex> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CoordinateIndex> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WorkspaceReader for WorkspaceResolver {
    fn repository(&self) -> WorkspaceRepository {
        self.identity()
    }

    fn find_artifact(&self, request: &ArtifactRequest) -> ApiResult<Option<PathBuf>> {
        Ok(WorkspaceResolver::find_artifact(self, request)?.map(|location| location.path))
    }

    fn find_versions(&self, request: &ArtifactRequest) -> ApiResult<Vec<String>> {
        WorkspaceResolver::find_versions(self, request)
    }
}
