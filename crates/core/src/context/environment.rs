use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_PROPERTY_PREFIX: &str = "env.";

/// Process-wide inputs captured once at session start.
///
/// Nothing downstream reads `std::env` directly; everything goes through this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEnvironment {
    variables: BTreeMap<String, String>,
    system_properties: BTreeMap<String, String>,
    home_dir: Option<PathBuf>,
    working_dir: PathBuf,
    case_sensitive: bool,
}

impl ProcessEnvironment {
    /// Snapshot the current process.
    pub fn capture() -> Self {
        let home_dir = dirs::home_dir();
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let mut system_properties = BTreeMap::new();
        if let Some(home) = &home_dir {
            system_properties.insert("user.home".to_string(), home.display().to_string());
        }
        system_properties.insert("user.dir".to_string(), working_dir.display().to_string());
        system_properties.insert("os.name".to_string(), std::env::consts::OS.to_string());
        system_properties.insert("os.arch".to_string(), std::env::consts::ARCH.to_string());
        system_properties.insert(
            "file.separator".to_string(),
            std::path::MAIN_SEPARATOR.to_string(),
        );
        system_properties.insert(
            "path.separator".to_string(),
            if cfg!(windows) { ";" } else { ":" }.to_string(),
        );
        system_properties.insert(
            "line.separator".to_string(),
            if cfg!(windows) { "\r\n" } else { "\n" }.to_string(),
        );

        Self {
            variables: unicode_vars(std::env::vars_os()),
            system_properties,
            home_dir,
            working_dir,
            case_sensitive: !cfg!(windows),
        }
    }

    /// An environment with no variables or properties, for hosts that want full control.
    pub fn isolated(home_dir: Option<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            variables: BTreeMap::new(),
            system_properties: BTreeMap::new(),
            home_dir,
            working_dir: working_dir.into(),
            case_sensitive: true,
        }
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Add raw process variables. Entries whose name or value is not valid
    /// Unicode cannot be exposed as properties and are skipped.
    pub fn with_vars_os<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        self.variables.extend(unicode_vars(vars));
        self
    }

    pub fn with_system_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.system_properties.insert(key.into(), value.into());
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn system_properties(&self) -> &BTreeMap<String, String> {
        &self.system_properties
    }

    pub fn home_dir(&self) -> Option<&Path> {
        self.home_dir.as_deref()
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Environment variables as `env.NAME` properties. Names are upper-cased
    /// when the platform treats them case-insensitively.
    pub fn env_properties(&self) -> BTreeMap<String, String> {
        self.variables
            .iter()
            .map(|(key, value)| {
                let key = if self.case_sensitive {
                    key.clone()
                } else {
                    key.to_uppercase()
                };
                (format!("{}{}", ENV_PROPERTY_PREFIX, key), value.clone())
            })
            .collect()
    }

    /// `~/.m2`, or `<working dir>/.m2` without a home directory.
    pub fn user_config_dir(&self) -> PathBuf {
        self.home_dir
            .as_deref()
            .unwrap_or(&self.working_dir)
            .join(".m2")
    }

    pub fn default_local_repository(&self) -> PathBuf {
        self.user_config_dir().join("repository")
    }

    pub fn default_user_settings(&self) -> PathBuf {
        self.user_config_dir().join("settings.json")
    }

    /// Anchor a relative path at the captured working directory.
    pub fn absolutize(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

fn unicode_vars<I>(vars: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                debug!(
                    "Skipping environment variable {:?}: not valid Unicode",
                    key.unwrap_or_else(|raw| raw.to_string_lossy().into_owned())
                );
                None
            }
        })
        .collect()
}
