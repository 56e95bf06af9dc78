use super::request::ExecutionRequest;
use super::{ExecutionContext, LocalRepository, ProcessEnvironment, RepositoryPolicy};
use crate::error::Result;
use crate::settings::{ConfigMerger, EffectiveSettings, SettingsRequest};
use embark_api::{Profile, SettingsLoader, UpdatePolicy};
use indexmap::IndexSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const ENGINE_HOME_PROPERTY: &str = "maven.home";

/// Produces one [`ExecutionContext`] per build session.
pub struct ExecutionContextBuilder {
    merger: ConfigMerger,
}

impl ExecutionContextBuilder {
    pub fn new(merger: ConfigMerger) -> Self {
        Self { merger }
    }

    pub fn with_collaborators(
        loader: Arc<dyn SettingsLoader>,
        environment: Arc<ProcessEnvironment>,
    ) -> Self {
        Self::new(ConfigMerger::new(loader, environment))
    }

    pub fn merger(&self) -> &ConfigMerger {
        &self.merger
    }

    /// Steps run in a fixed order: settings, user properties, system properties,
    /// profiles, local repository, policies. Any failure aborts the whole build;
    /// no partial context is ever returned.
    pub fn build(&self, request: ExecutionRequest) -> Result<Arc<ExecutionContext>> {
        let environment = self.merger.environment();

        let settings_request = SettingsRequest {
            global_settings_file: request.global_settings_file.clone(),
            user_settings_file: request.user_settings_file.clone(),
            local_repository: request.local_repository_path.clone(),
            user_properties: request.user_properties.clone(),
            system_properties: request.system_properties.clone(),
            engine_home: request.engine_home.clone(),
        };
        let EffectiveSettings {
            settings,
            local_repository,
            global_settings_file,
            user_settings_file,
        } = self.merger.build_effective_settings(&settings_request)?;

        let user_properties = request.user_properties.clone();

        let mut system_properties = self.merger.system_properties(&settings_request);
        if let Some(home) = &request.engine_home {
            system_properties.insert(
                ENGINE_HOME_PROPERTY.to_string(),
                environment.absolutize(home).display().to_string(),
            );
        }

        let (profiles, active_profiles) =
            resolve_profiles(&settings.profiles, &settings.active_profiles, &request);

        std::fs::create_dir_all(&local_repository)?;
        let local_repository = LocalRepository::new(local_repository);

        let releases = RepositoryPolicy {
            enabled: true,
            update_policy: settings.update_policy.unwrap_or_default(),
            checksum_policy: request
                .global_checksum_policy
                .or(settings.checksum_policy)
                .unwrap_or_default(),
        };
        let snapshots = if request.update_snapshots {
            RepositoryPolicy {
                update_policy: UpdatePolicy::Always,
                ..releases
            }
        } else {
            releases
        };

        let pom = request.pom.as_ref().map(|p| environment.absolutize(p));
        let base_directory = request
            .base_directory
            .as_ref()
            .map(|dir| environment.absolutize(dir))
            .or_else(|| pom.as_ref().and_then(|p| p.parent()).map(|p| p.to_path_buf()))
            .unwrap_or_else(|| environment.working_dir().to_path_buf());

        let context = ExecutionContext {
            pom,
            base_directory,
            goals: request.goals,
            local_repository,
            global_settings_file,
            user_settings_file,
            offline: request.offline.or(settings.offline).unwrap_or(false),
            interactive: request
                .interactive
                .or(settings.interactive_mode)
                .unwrap_or(true),
            settings,
            user_properties,
            system_properties,
            profiles,
            active_profiles,
            inactive_profiles: request.inactive_profiles,
            update_snapshots: request.update_snapshots,
            cache_not_found: request.cache_not_found,
            cache_transfer_error: true,
            releases,
            snapshots,
            logging_level: request.logging_level,
            validation_level: request.validation_level,
            process_plugins: request.process_plugins,
            resolve_dependencies: request.resolve_dependencies,
            workspace_reader: request.workspace_reader,
            cancel_token: CancellationToken::new(),
        };

        info!(
            local_repository = %context.local_repository.basedir.display(),
            active_profiles = ?context.active_profiles,
            offline = context.offline,
            "Built execution context"
        );

        Ok(Arc::new(context))
    }
}

/// Settings profiles plus a bare record for each explicit id the settings do not
/// declare. Active set: settings list, active-by-default, explicit ids, minus
/// explicitly inactive ids.
fn resolve_profiles(
    declared: &[Profile],
    settings_active: &[String],
    request: &ExecutionRequest,
) -> (Vec<Profile>, Vec<String>) {
    let mut profiles = declared.to_vec();
    let mut active: IndexSet<String> = settings_active.iter().cloned().collect();

    active.extend(
        declared
            .iter()
            .filter(|p| p.active_by_default)
            .map(|p| p.id.clone()),
    );

    for id in &request.profiles {
        if !profiles.iter().any(|p| &p.id == id) {
            profiles.push(Profile::cli(id.clone()));
        }
        active.insert(id.clone());
    }

    active.retain(|id| !request.inactive_profiles.contains(id));

    (profiles, active.into_iter().collect())
}
