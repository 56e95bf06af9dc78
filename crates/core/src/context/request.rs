use embark_api::{ChecksumPolicy, ValidationLevel, WorkspaceReader};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;

/// Logging threshold for a build session, ordered from most to least verbose.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
    Disabled,
}

impl LoggingLevel {
    /// Numeric thresholds 0 (debug) through 5 (disabled); out-of-range values disable.
    pub fn from_threshold(threshold: u8) -> Self {
        match threshold {
            0 => LoggingLevel::Debug,
            1 => LoggingLevel::Info,
            2 => LoggingLevel::Warn,
            3 => LoggingLevel::Error,
            4 => LoggingLevel::Fatal,
            _ => LoggingLevel::Disabled,
        }
    }

    pub fn threshold(self) -> u8 {
        self as u8
    }

    pub fn level_filter(self) -> LevelFilter {
        match self {
            LoggingLevel::Debug => LevelFilter::DEBUG,
            LoggingLevel::Info => LevelFilter::INFO,
            LoggingLevel::Warn => LevelFilter::WARN,
            LoggingLevel::Error | LoggingLevel::Fatal => LevelFilter::ERROR,
            LoggingLevel::Disabled => LevelFilter::OFF,
        }
    }
}

impl fmt::Display for LoggingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoggingLevel::Debug => "debug",
            LoggingLevel::Info => "info",
            LoggingLevel::Warn => "warn",
            LoggingLevel::Error => "error",
            LoggingLevel::Fatal => "fatal",
            LoggingLevel::Disabled => "disabled",
        };
        f.write_str(name)
    }
}

impl FromStr for LoggingLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LoggingLevel::Debug),
            "info" => Ok(LoggingLevel::Info),
            "warn" | "warning" => Ok(LoggingLevel::Warn),
            "error" => Ok(LoggingLevel::Error),
            "fatal" => Ok(LoggingLevel::Fatal),
            "disabled" | "off" => Ok(LoggingLevel::Disabled),
            other => other
                .parse::<u8>()
                .map(LoggingLevel::from_threshold)
                .map_err(|_| format!("unknown logging level '{}'", s)),
        }
    }
}

/// Everything a caller may say about one build invocation.
///
/// Unset options fall back to the resolved settings.
#[derive(Clone, Default)]
pub struct ExecutionRequest {
    pub pom: Option<PathBuf>,
    pub base_directory: Option<PathBuf>,
    pub global_settings_file: Option<PathBuf>,
    pub user_settings_file: Option<PathBuf>,
    pub local_repository_path: Option<PathBuf>,
    pub user_properties: BTreeMap<String, String>,
    pub system_properties: BTreeMap<String, String>,
    pub profiles: Vec<String>,
    pub inactive_profiles: Vec<String>,
    pub goals: Vec<String>,
    pub offline: Option<bool>,
    pub interactive: Option<bool>,
    pub update_snapshots: bool,
    pub cache_not_found: bool,
    pub global_checksum_policy: Option<ChecksumPolicy>,
    pub logging_level: LoggingLevel,
    pub validation_level: ValidationLevel,
    pub process_plugins: bool,
    pub resolve_dependencies: bool,
    pub engine_home: Option<PathBuf>,
    pub workspace_reader: Option<Arc<dyn WorkspaceReader>>,
}

impl ExecutionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pom(mut self, pom: impl Into<PathBuf>) -> Self {
        self.pom = Some(pom.into());
        self
    }

    pub fn with_base_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_directory = Some(dir.into());
        self
    }

    pub fn with_global_settings(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_settings_file = Some(path.into());
        self
    }

    pub fn with_user_settings(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_settings_file = Some(path.into());
        self
    }

    pub fn with_local_repository(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_repository_path = Some(path.into());
        self
    }

    pub fn with_user_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.user_properties.insert(key.into(), value.into());
        self
    }

    pub fn with_system_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.system_properties.insert(key.into(), value.into());
        self
    }

    pub fn with_profile(mut self, id: impl Into<String>) -> Self {
        self.profiles.push(id.into());
        self
    }

    pub fn with_inactive_profile(mut self, id: impl Into<String>) -> Self {
        self.inactive_profiles.push(id.into());
        self
    }

    pub fn with_goals<I, S>(mut self, goals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.goals = goals.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = Some(offline);
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = Some(interactive);
        self
    }

    pub fn with_update_snapshots(mut self, update: bool) -> Self {
        self.update_snapshots = update;
        self
    }

    pub fn with_cache_not_found(mut self, cache: bool) -> Self {
        self.cache_not_found = cache;
        self
    }

    pub fn with_checksum_policy(mut self, policy: ChecksumPolicy) -> Self {
        self.global_checksum_policy = Some(policy);
        self
    }

    pub fn with_logging_level(mut self, level: LoggingLevel) -> Self {
        self.logging_level = level;
        self
    }

    pub fn with_validation_level(mut self, level: ValidationLevel) -> Self {
        self.validation_level = level;
        self
    }

    pub fn with_process_plugins(mut self, process: bool) -> Self {
        self.process_plugins = process;
        self
    }

    pub fn with_resolve_dependencies(mut self, resolve: bool) -> Self {
        self.resolve_dependencies = resolve;
        self
    }

    pub fn with_engine_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.engine_home = Some(home.into());
        self
    }

    pub fn with_workspace_reader(mut self, reader: Arc<dyn WorkspaceReader>) -> Self {
        self.workspace_reader = Some(reader);
        self
    }
}

impl fmt::Debug for ExecutionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionRequest")
            .field("pom", &self.pom)
            .field("base_directory", &self.base_directory)
            .field("local_repository_path", &self.local_repository_path)
            .field("profiles", &self.profiles)
            .field("goals", &self.goals)
            .field("offline", &self.offline)
            .field("logging_level", &self.logging_level)
            .field("workspace_reader", &self.workspace_reader.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_level_thresholds() {
        assert_eq!(LoggingLevel::from_threshold(0), LoggingLevel::Debug);
        assert_eq!(LoggingLevel::from_threshold(9), LoggingLevel::Disabled);
        assert_eq!(LoggingLevel::Warn.threshold(), 2);
        assert!(LoggingLevel::Debug < LoggingLevel::Error);
    }

    #[test]
    fn test_logging_level_parse() {
        assert_eq!("WARN".parse::<LoggingLevel>().unwrap(), LoggingLevel::Warn);
        assert_eq!("1".parse::<LoggingLevel>().unwrap(), LoggingLevel::Info);
        assert_eq!("off".parse::<LoggingLevel>().unwrap(), LoggingLevel::Disabled);
        assert_eq!(
            "loud".parse::<LoggingLevel>().unwrap_err(),
            "unknown logging level 'loud'"
        );
    }

    #[test]
    fn test_reader_flags() {
        let request = ExecutionRequest::new()
            .with_process_plugins(true)
            .with_resolve_dependencies(true)
            .with_cache_not_found(true);
        assert!(request.process_plugins);
        assert!(request.resolve_dependencies);
        assert!(request.cache_not_found);

        let defaults = ExecutionRequest::new();
        assert!(!defaults.process_plugins && !defaults.resolve_dependencies);
    }

    #[test]
    fn test_logging_level_filter() {
        assert_eq!(LoggingLevel::Fatal.level_filter(), LevelFilter::ERROR);
        assert_eq!(LoggingLevel::Disabled.level_filter(), LevelFilter::OFF);
    }
}
