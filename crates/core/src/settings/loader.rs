use embark_api::{ApiError, ApiResult, Settings, SettingsLoader};
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Reads settings files written as JSON documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSettingsLoader;

impl JsonSettingsLoader {
    pub fn new() -> Self {
        Self
    }
}

impl SettingsLoader for JsonSettingsLoader {
    fn load(&self, path: &Path) -> ApiResult<Option<Settings>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No settings file at {}", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(ApiError::SettingsParse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(Some(Settings::default()));
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| ApiError::SettingsParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}
