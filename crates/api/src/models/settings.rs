use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePolicy {
    #[default]
    Always,
    Daily,
    Never,
}

impl fmt::Display for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpdatePolicy::Always => "always",
            UpdatePolicy::Daily => "daily",
            UpdatePolicy::Never => "never",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumPolicy {
    Fail,
    #[default]
    Warn,
    Ignore,
}

impl fmt::Display for ChecksumPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChecksumPolicy::Fail => "fail",
            ChecksumPolicy::Warn => "warn",
            ChecksumPolicy::Ignore => "ignore",
        };
        f.write_str(name)
    }
}

/// Where a profile record came from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProfileSource {
    #[default]
    Settings,
    Cli,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub id: String,
    pub active_by_default: bool,
    pub properties: BTreeMap<String, String>,
    pub source: ProfileSource,
}

impl Profile {
    /// A bare profile record for ad hoc activation from the command line.
    pub fn cli(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: ProfileSource::Cli,
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Mirror {
    pub id: String,
    pub mirror_of: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Server {
    pub id: String,
    pub username: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Proxy {
    pub id: String,
    pub active: bool,
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub non_proxy_hosts: Option<String>,
}

impl Default for Proxy {
    fn default() -> Self {
        Self {
            id: String::new(),
            active: true,
            protocol: "http".to_string(),
            host: String::new(),
            port: 8080,
            non_proxy_hosts: None,
        }
    }
}

/// Raw content of one settings file. Every scalar is optional so that an
/// unset value in a higher layer never masks a lower one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub local_repository: Option<String>,
    pub offline: Option<bool>,
    pub interactive_mode: Option<bool>,
    pub update_policy: Option<UpdatePolicy>,
    pub checksum_policy: Option<ChecksumPolicy>,
    pub active_profiles: Vec<String>,
    pub profiles: Vec<Profile>,
    pub mirrors: Vec<Mirror>,
    pub servers: Vec<Server>,
    pub proxies: Vec<Proxy>,
}

impl Settings {
    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// The first active proxy, if any.
    pub fn active_proxy(&self) -> Option<&Proxy> {
        self.proxies.iter().find(|p| p.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_deserialize_partial() {
        let json = r#"{
            "localRepository": "/data/repo",
            "activeProfiles": ["ci"],
            "profiles": [{ "id": "ci", "properties": { "skipTests": "true" } }],
            "checksumPolicy": "fail"
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.local_repository.as_deref(), Some("/data/repo"));
        assert_eq!(settings.offline, None);
        assert_eq!(settings.checksum_policy, Some(ChecksumPolicy::Fail));
        let ci = settings.profile("ci").unwrap();
        assert_eq!(ci.source, ProfileSource::Settings);
        assert_eq!(ci.properties.get("skipTests").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_proxy_defaults_to_active() {
        let settings: Settings =
            serde_json::from_str(r#"{ "proxies": [{ "id": "p", "host": "proxy.local" }] }"#)
                .unwrap();
        let proxy = settings.active_proxy().unwrap();
        assert_eq!(proxy.port, 8080);
        assert_eq!(proxy.protocol, "http");
    }
}
