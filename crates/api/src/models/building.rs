use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// How strictly the project reader validates descriptors.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    Minimal,
    #[default]
    Maven2,
    Maven3,
}

/// The slice of the execution context handed to the project reader for each read.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBuildingRequest {
    pub validation_level: ValidationLevel,
    pub process_plugins: bool,
    pub resolve_dependencies: bool,
    pub local_repository: PathBuf,
    pub offline: bool,
    pub user_properties: BTreeMap<String, String>,
    pub system_properties: BTreeMap<String, String>,
    pub active_profiles: BTreeSet<String>,
    pub inactive_profiles: BTreeSet<String>,
}
