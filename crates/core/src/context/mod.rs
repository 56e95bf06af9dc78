//! Execution context: the merged, read-only configuration for one build session.

pub mod builder;
pub mod environment;
pub mod request;

pub use builder::ExecutionContextBuilder;
pub use environment::ProcessEnvironment;
pub use request::{ExecutionRequest, LoggingLevel};

use embark_api::{
    ChecksumPolicy, ProjectBuildingRequest, Profile, Settings, UpdatePolicy, ValidationLevel,
    WorkspaceReader,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const LOCAL_REPOSITORY_ID: &str = "local";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LocalRepository {
    pub id: String,
    pub basedir: PathBuf,
    pub url: String,
}

impl LocalRepository {
    pub fn new(basedir: PathBuf) -> Self {
        let url = format!("file://{}", basedir.display());
        Self {
            id: LOCAL_REPOSITORY_ID.to_string(),
            basedir,
            url,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryPolicy {
    pub enabled: bool,
    pub update_policy: UpdatePolicy,
    pub checksum_policy: ChecksumPolicy,
}

/// Fully merged configuration for one build session.
///
/// Built once by [`ExecutionContextBuilder`] and shared read-only; a host that
/// needs different configuration builds a new context.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContext {
    pub(crate) pom: Option<PathBuf>,
    pub(crate) base_directory: PathBuf,
    pub(crate) goals: Vec<String>,
    pub(crate) local_repository: LocalRepository,
    pub(crate) global_settings_file: Option<PathBuf>,
    pub(crate) user_settings_file: PathBuf,
    pub(crate) settings: Settings,
    pub(crate) user_properties: BTreeMap<String, String>,
    pub(crate) system_properties: BTreeMap<String, String>,
    pub(crate) profiles: Vec<Profile>,
    pub(crate) active_profiles: Vec<String>,
    pub(crate) inactive_profiles: Vec<String>,
    pub(crate) offline: bool,
    pub(crate) interactive: bool,
    pub(crate) update_snapshots: bool,
    pub(crate) cache_not_found: bool,
    pub(crate) cache_transfer_error: bool,
    pub(crate) releases: RepositoryPolicy,
    pub(crate) snapshots: RepositoryPolicy,
    pub(crate) logging_level: LoggingLevel,
    pub(crate) validation_level: ValidationLevel,
    pub(crate) process_plugins: bool,
    pub(crate) resolve_dependencies: bool,
    #[serde(skip)]
    pub(crate) workspace_reader: Option<Arc<dyn WorkspaceReader>>,
    #[serde(skip)]
    pub(crate) cancel_token: CancellationToken,
}

impl ExecutionContext {
    pub fn pom(&self) -> Option<&Path> {
        self.pom.as_deref()
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn goals(&self) -> &[String] {
        &self.goals
    }

    pub fn local_repository(&self) -> &LocalRepository {
        &self.local_repository
    }

    pub fn global_settings_file(&self) -> Option<&Path> {
        self.global_settings_file.as_deref()
    }

    pub fn user_settings_file(&self) -> &Path {
        &self.user_settings_file
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn user_properties(&self) -> &BTreeMap<String, String> {
        &self.user_properties
    }

    pub fn system_properties(&self) -> &BTreeMap<String, String> {
        &self.system_properties
    }

    /// User properties shadow system properties of the same name.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.user_properties
            .get(key)
            .or_else(|| self.system_properties.get(key))
            .map(String::as_str)
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn active_profiles(&self) -> &[String] {
        &self.active_profiles
    }

    pub fn inactive_profiles(&self) -> &[String] {
        &self.inactive_profiles
    }

    pub fn is_profile_active(&self, id: &str) -> bool {
        self.active_profiles.iter().any(|p| p == id)
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn update_snapshots(&self) -> bool {
        self.update_snapshots
    }

    pub fn cache_not_found(&self) -> bool {
        self.cache_not_found
    }

    pub fn cache_transfer_error(&self) -> bool {
        self.cache_transfer_error
    }

    pub fn releases_policy(&self) -> RepositoryPolicy {
        self.releases
    }

    pub fn snapshots_policy(&self) -> RepositoryPolicy {
        self.snapshots
    }

    pub fn logging_level(&self) -> LoggingLevel {
        self.logging_level
    }

    pub fn workspace_reader(&self) -> Option<&Arc<dyn WorkspaceReader>> {
        self.workspace_reader.as_ref()
    }

    /// Signal checked by the build engine between modules.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// The view handed to the project reader for every read in this session.
    pub fn project_building_request(&self) -> ProjectBuildingRequest {
        ProjectBuildingRequest {
            validation_level: self.validation_level,
            process_plugins: self.process_plugins,
            resolve_dependencies: self.resolve_dependencies,
            local_repository: self.local_repository.basedir.clone(),
            offline: self.offline,
            user_properties: self.user_properties.clone(),
            system_properties: self.system_properties.clone(),
            active_profiles: self.active_profiles.iter().cloned().collect(),
            inactive_profiles: self.inactive_profiles.iter().cloned().collect(),
        }
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("pom", &self.pom)
            .field("base_directory", &self.base_directory)
            .field("local_repository", &self.local_repository)
            .field("active_profiles", &self.active_profiles)
            .field("offline", &self.offline)
            .field("logging_level", &self.logging_level)
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
