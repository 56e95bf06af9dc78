//! Artifact identity and matching against a single module.

use embark_api::{ArtifactHandlers, ArtifactRequest, AttachedArtifact, ProjectDescriptor};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub const POM_EXTENSION: &str = "pom";
pub const DEFAULT_BUILD_DIRECTORY: &str = "target";

/// Repository identity of an artifact: `group:artifact:extension[:classifier]`.
///
/// Uses the file extension rather than the packaging, so it reflects identity
/// as a repository sees it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConflictKey {
    pub group_id: String,
    pub artifact_id: String,
    pub extension: String,
    pub classifier: Option<String>,
}

impl ConflictKey {
    pub fn new(group_id: &str, artifact_id: &str, extension: &str, classifier: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            extension: extension.to_string(),
            classifier: (!classifier.is_empty()).then(|| classifier.to_string()),
        }
    }

    pub fn of_request(request: &ArtifactRequest) -> Self {
        Self::new(
            &request.group_id,
            &request.artifact_id,
            &request.extension,
            &request.classifier,
        )
    }

    pub fn of_attached(descriptor: &ProjectDescriptor, attached: &AttachedArtifact) -> Self {
        Self::new(
            &descriptor.group_id,
            &descriptor.artifact_id,
            &attached.extension,
            &attached.classifier,
        )
    }
}

impl fmt::Display for ConflictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.extension)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LocationState {
    /// The module's own descriptor file.
    Descriptor,
    /// A file the module reported as produced.
    Built,
    /// Where the primary artifact will be written; may not exist yet.
    Expected,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    pub path: PathBuf,
    pub state: LocationState,
}

impl ArtifactLocation {
    fn new(path: PathBuf, state: LocationState) -> Self {
        Self { path, state }
    }
}

/// Decides whether a module's primary or attached artifacts satisfy a request.
#[derive(Clone)]
pub struct ArtifactMatcher {
    handlers: Arc<dyn ArtifactHandlers>,
    build_directory: String,
}

impl ArtifactMatcher {
    pub fn new(handlers: Arc<dyn ArtifactHandlers>) -> Self {
        Self {
            handlers,
            build_directory: DEFAULT_BUILD_DIRECTORY.to_string(),
        }
    }

    /// Build-area directory name, relative to each module's base directory.
    pub fn with_build_directory(mut self, build_directory: impl Into<String>) -> Self {
        self.build_directory = build_directory.into();
        self
    }

    /// Extension of the primary artifact; unknown packagings stand for themselves.
    pub fn primary_extension(&self, descriptor: &ProjectDescriptor) -> String {
        self.handlers
            .extension(&descriptor.packaging)
            .unwrap_or_else(|| descriptor.packaging.clone())
    }

    pub fn primary_key(&self, descriptor: &ProjectDescriptor) -> ConflictKey {
        ConflictKey::new(
            &descriptor.group_id,
            &descriptor.artifact_id,
            &self.primary_extension(descriptor),
            "",
        )
    }

    /// `<base>/<build dir>/<artifactId>-<version>.<extension>`
    pub fn expected_path(&self, descriptor: &ProjectDescriptor) -> PathBuf {
        descriptor.base_dir.join(&self.build_directory).join(format!(
            "{}-{}.{}",
            descriptor.artifact_id,
            descriptor.version,
            self.primary_extension(descriptor)
        ))
    }

    /// Find the file satisfying `request` among this module's outputs.
    ///
    /// An unbuilt primary artifact resolves to its expected output path.
    pub fn find(
        &self,
        descriptor: &ProjectDescriptor,
        request: &ArtifactRequest,
    ) -> Option<ArtifactLocation> {
        if request.extension == POM_EXTENSION {
            return Some(ArtifactLocation::new(
                descriptor.file.clone(),
                LocationState::Descriptor,
            ));
        }

        let requested = ConflictKey::of_request(request);

        if requested == self.primary_key(descriptor) {
            return Some(match &descriptor.artifact_file {
                Some(file) => ArtifactLocation::new(file.clone(), LocationState::Built),
                None => ArtifactLocation::new(
                    self.expected_path(descriptor),
                    LocationState::Expected,
                ),
            });
        }

        descriptor
            .attached_artifacts
            .iter()
            .find(|attached| ConflictKey::of_attached(descriptor, attached) == requested)
            .map(|attached| ArtifactLocation::new(attached.file.clone(), LocationState::Built))
    }
}

impl fmt::Debug for ArtifactMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactMatcher")
            .field("build_directory", &self.build_directory)
            .finish_non_exhaustive()
    }
}
