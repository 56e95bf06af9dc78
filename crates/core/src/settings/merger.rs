use super::interpolate::Interpolator;
use crate::context::ProcessEnvironment;
use crate::error::{EmbarkError, Result};
use embark_api::{Settings, SettingsLoader};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Caller-supplied inputs to settings resolution.
#[derive(Debug, Clone, Default)]
pub struct SettingsRequest {
    pub global_settings_file: Option<PathBuf>,
    pub user_settings_file: Option<PathBuf>,
    pub local_repository: Option<PathBuf>,
    pub user_properties: BTreeMap<String, String>,
    pub system_properties: BTreeMap<String, String>,
    pub engine_home: Option<PathBuf>,
}

/// Settings after every layer has been applied.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveSettings {
    pub settings: Settings,
    pub local_repository: PathBuf,
    pub global_settings_file: Option<PathBuf>,
    pub user_settings_file: PathBuf,
}

/// Layers defaults, global settings, user settings and explicit overrides.
pub struct ConfigMerger {
    loader: Arc<dyn SettingsLoader>,
    environment: Arc<ProcessEnvironment>,
}

impl ConfigMerger {
    pub fn new(loader: Arc<dyn SettingsLoader>, environment: Arc<ProcessEnvironment>) -> Self {
        Self {
            loader,
            environment,
        }
    }

    pub fn environment(&self) -> &Arc<ProcessEnvironment> {
        &self.environment
    }

    /// Explicit path, else `<engine home>/conf/settings.json`, else none.
    pub fn global_settings_path(&self, request: &SettingsRequest) -> Option<PathBuf> {
        request
            .global_settings_file
            .clone()
            .or_else(|| {
                request
                    .engine_home
                    .as_ref()
                    .map(|home| home.join("conf").join("settings.json"))
            })
            .map(|path| self.environment.absolutize(&path))
    }

    pub fn user_settings_path(&self, request: &SettingsRequest) -> PathBuf {
        request
            .user_settings_file
            .as_ref()
            .map(|path| self.environment.absolutize(path))
            .unwrap_or_else(|| self.environment.default_user_settings())
    }

    /// Process properties, then caller properties, then `env.*`; later entries overwrite.
    pub fn system_properties(&self, request: &SettingsRequest) -> BTreeMap<String, String> {
        let mut properties = self.environment.system_properties().clone();
        properties.extend(request.system_properties.clone());
        properties.extend(self.environment.env_properties());
        properties
    }

    pub fn build_effective_settings(&self, request: &SettingsRequest) -> Result<EffectiveSettings> {
        let global_settings_file = self.global_settings_path(request);
        let user_settings_file = self.user_settings_path(request);

        let mut settings = Settings::default();
        if let Some(path) = &global_settings_file {
            if let Some(global) = self.loader.load(path)? {
                debug!("Applying global settings from {}", path.display());
                settings = merge_settings(settings, global);
            }
        }
        if let Some(user) = self.loader.load(&user_settings_file)? {
            debug!("Applying user settings from {}", user_settings_file.display());
            settings = merge_settings(settings, user);
        }

        let system_properties = self.system_properties(request);
        let interpolator = Interpolator::new(vec![&request.user_properties, &system_properties]);
        interpolate_settings(&mut settings, &interpolator);
        validate_settings(&settings)?;

        let local_repository = self.resolve_local_repository(request, &settings);
        info!(
            local_repository = %local_repository.display(),
            active_profiles = settings.active_profiles.len(),
            "Resolved effective settings"
        );

        Ok(EffectiveSettings {
            settings,
            local_repository,
            global_settings_file,
            user_settings_file,
        })
    }

    /// Explicit override, then the settings value, then the platform default.
    fn resolve_local_repository(&self, request: &SettingsRequest, settings: &Settings) -> PathBuf {
        if let Some(path) = &request.local_repository {
            return self.environment.absolutize(path);
        }
        settings
            .local_repository
            .as_deref()
            .map(str::trim)
            .map(|path| path.strip_prefix("file://").unwrap_or(path))
            .filter(|path| !path.is_empty())
            .map(|path| self.environment.absolutize(Path::new(path)))
            .unwrap_or_else(|| self.environment.default_local_repository())
    }
}

/// Overlay `dominant` onto `recessive`. Unset scalars never mask lower layers;
/// id-keyed lists are merged with the dominant entry replacing.
pub fn merge_settings(recessive: Settings, dominant: Settings) -> Settings {
    let mut active_profiles: IndexSet<String> = recessive.active_profiles.into_iter().collect();
    active_profiles.extend(dominant.active_profiles);

    Settings {
        local_repository: dominant.local_repository.or(recessive.local_repository),
        offline: dominant.offline.or(recessive.offline),
        interactive_mode: dominant.interactive_mode.or(recessive.interactive_mode),
        update_policy: dominant.update_policy.or(recessive.update_policy),
        checksum_policy: dominant.checksum_policy.or(recessive.checksum_policy),
        active_profiles: active_profiles.into_iter().collect(),
        profiles: merge_by_id(recessive.profiles, dominant.profiles, |p| p.id.clone()),
        mirrors: merge_by_id(recessive.mirrors, dominant.mirrors, |m| m.id.clone()),
        servers: merge_by_id(recessive.servers, dominant.servers, |s| s.id.clone()),
        proxies: merge_by_id(recessive.proxies, dominant.proxies, |p| p.id.clone()),
    }
}

fn merge_by_id<T>(recessive: Vec<T>, dominant: Vec<T>, id: impl Fn(&T) -> String) -> Vec<T> {
    let mut merged: IndexMap<String, T> = IndexMap::new();
    for item in recessive.into_iter().chain(dominant) {
        merged.insert(id(&item), item);
    }
    merged.into_values().collect()
}

fn interpolate_settings(settings: &mut Settings, interpolator: &Interpolator<'_>) {
    if let Some(path) = &settings.local_repository {
        settings.local_repository = Some(interpolator.interpolate(path));
    }
    for profile in &mut settings.profiles {
        for value in profile.properties.values_mut() {
            *value = interpolator.interpolate(value);
        }
    }
    for mirror in &mut settings.mirrors {
        mirror.url = interpolator.interpolate(&mirror.url);
    }
}

fn validate_settings(settings: &Settings) -> Result<()> {
    if let Some(proxy) = settings.active_proxy() {
        if proxy.host.trim().is_empty() {
            return Err(EmbarkError::SettingsConfiguration(format!(
                "proxy '{}' in settings has no host",
                proxy.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::JsonSettingsLoader;
    use embark_api::{ApiError, Mirror, Profile};
    use std::fs;

    struct Fixture {
        _temp: tempfile::TempDir,
        home: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = tempfile::tempdir().unwrap();
            let home = temp.path().join("home");
            fs::create_dir_all(home.join(".m2")).unwrap();
            Self { _temp: temp, home }
        }

        fn environment(&self) -> ProcessEnvironment {
            ProcessEnvironment::isolated(Some(self.home.clone()), "/work")
        }

        fn merger(&self, environment: ProcessEnvironment) -> ConfigMerger {
            ConfigMerger::new(Arc::new(JsonSettingsLoader::new()), Arc::new(environment))
        }

        fn write(&self, relative: &str, content: &str) -> PathBuf {
            let path = self.home.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
            path
        }
    }

    #[test]
    fn test_defaults_without_any_settings() {
        let fixture = Fixture::new();
        let merger = fixture.merger(fixture.environment());

        let effective = merger
            .build_effective_settings(&SettingsRequest::default())
            .unwrap();
        assert_eq!(
            effective.local_repository,
            fixture.home.join(".m2/repository")
        );
        assert_eq!(effective.settings, Settings::default());
        assert!(effective.global_settings_file.is_none());
    }

    #[test]
    fn test_explicit_override_beats_settings() {
        let fixture = Fixture::new();
        fixture.write(".m2/settings.json", r#"{ "localRepository": "/from/settings" }"#);
        let merger = fixture.merger(fixture.environment());

        let request = SettingsRequest {
            local_repository: Some(PathBuf::from("/tmp/repo")),
            ..Default::default()
        };
        let effective = merger.build_effective_settings(&request).unwrap();
        assert_eq!(effective.local_repository, PathBuf::from("/tmp/repo"));

        let effective = merger
            .build_effective_settings(&SettingsRequest::default())
            .unwrap();
        assert_eq!(effective.local_repository, PathBuf::from("/from/settings"));
    }

    #[test]
    fn test_user_settings_override_global() {
        let fixture = Fixture::new();
        let global = fixture.write(
            "engine/conf/settings.json",
            r#"{
                "localRepository": "/global/repo",
                "offline": true,
                "activeProfiles": ["base", "shared"],
                "mirrors": [{ "id": "central", "mirrorOf": "*", "url": "https://global" }]
            }"#,
        );
        fixture.write(
            ".m2/settings.json",
            r#"{
                "localRepository": "/user/repo",
                "activeProfiles": ["shared", "dev"],
                "mirrors": [{ "id": "central", "mirrorOf": "*", "url": "https://user" }]
            }"#,
        );
        let merger = fixture.merger(fixture.environment());

        let request = SettingsRequest {
            engine_home: Some(fixture.home.join("engine")),
            ..Default::default()
        };
        let effective = merger.build_effective_settings(&request).unwrap();

        assert_eq!(effective.global_settings_file, Some(global));
        assert_eq!(effective.local_repository, PathBuf::from("/user/repo"));
        assert_eq!(effective.settings.offline, Some(true));
        assert_eq!(effective.settings.active_profiles, vec!["base", "shared", "dev"]);
        assert_eq!(
            effective.settings.mirrors,
            vec![Mirror {
                id: "central".to_string(),
                mirror_of: "*".to_string(),
                url: "https://user".to_string(),
            }]
        );
    }

    #[test]
    fn test_malformed_settings_is_error() {
        let fixture = Fixture::new();
        fixture.write(".m2/settings.json", "{ \"offline\": ");
        let merger = fixture.merger(fixture.environment());

        let err = merger
            .build_effective_settings(&SettingsRequest::default())
            .unwrap_err();
        assert!(matches!(err, EmbarkError::Api(ApiError::SettingsParse { .. })));
    }

    #[test]
    fn test_missing_explicit_settings_file_is_not_error() {
        let fixture = Fixture::new();
        let merger = fixture.merger(fixture.environment());
        let request = SettingsRequest {
            user_settings_file: Some(fixture.home.join("nowhere.json")),
            global_settings_file: Some(fixture.home.join("also-nowhere.json")),
            ..Default::default()
        };
        assert!(merger.build_effective_settings(&request).is_ok());
    }

    #[test]
    fn test_env_properties_layered_under_user_properties() {
        let fixture = Fixture::new();
        let merger = fixture.merger(fixture.environment().with_var("FOO", "bar"));

        let request = SettingsRequest {
            user_properties: [("env.FOO".to_string(), "explicit".to_string())]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let system = merger.system_properties(&request);
        assert_eq!(system.get("env.FOO").map(String::as_str), Some("bar"));

        fixture.write(
            ".m2/settings.json",
            r#"{ "profiles": [{ "id": "p", "properties": { "foo": "${env.FOO}" } }] }"#,
        );
        let effective = merger.build_effective_settings(&request).unwrap();
        let profile = effective.settings.profile("p").unwrap();
        assert_eq!(profile.properties.get("foo").map(String::as_str), Some("explicit"));
    }

    #[test]
    fn test_local_repository_interpolated_from_env() {
        let fixture = Fixture::new();
        fixture.write(".m2/settings.json", r#"{ "localRepository": "${env.REPO_ROOT}/m2" }"#);
        let merger = fixture.merger(fixture.environment().with_var("REPO_ROOT", "/cache"));

        let effective = merger
            .build_effective_settings(&SettingsRequest::default())
            .unwrap();
        assert_eq!(effective.local_repository, PathBuf::from("/cache/m2"));
    }

    #[test]
    fn test_relative_repository_anchored_at_working_dir() {
        let fixture = Fixture::new();
        let merger = fixture.merger(fixture.environment());
        let request = SettingsRequest {
            local_repository: Some(PathBuf::from("target/repo")),
            ..Default::default()
        };
        let effective = merger.build_effective_settings(&request).unwrap();
        assert_eq!(effective.local_repository, Path::new("/work").join("target/repo"));
    }

    #[test]
    fn test_active_proxy_without_host_rejected() {
        let fixture = Fixture::new();
        fixture.write(".m2/settings.json", r#"{ "proxies": [{ "id": "corp", "host": "" }] }"#);
        let merger = fixture.merger(fixture.environment());

        let err = merger
            .build_effective_settings(&SettingsRequest::default())
            .unwrap_err();
        assert!(matches!(err, EmbarkError::SettingsConfiguration(_)));
    }

    #[test]
    fn test_merge_profiles_by_id() {
        let recessive = Settings {
            profiles: vec![Profile {
                id: "a".to_string(),
                active_by_default: true,
                ..Default::default()
            }],
            ..Default::default()
        };
        let dominant = Settings {
            profiles: vec![
                Profile {
                    id: "a".to_string(),
                    ..Default::default()
                },
                Profile {
                    id: "b".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let merged = merge_settings(recessive, dominant);
        assert_eq!(merged.profiles.len(), 2);
        assert!(!merged.profile("a").unwrap().active_by_default);
    }
}
