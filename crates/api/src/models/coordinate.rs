use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extension assumed when a coordinate string does not name one.
pub const DEFAULT_EXTENSION: &str = "jar";

/// The `(groupId, artifactId, version)` triple identifying a module.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// `group:artifact`, the key shared by every version of a module.
    pub fn versionless_key(&self) -> String {
        versionless_key(&self.group_id, &self.artifact_id)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

pub fn versionless_key(group_id: &str, artifact_id: &str) -> String {
    format!("{}:{}", group_id, artifact_id)
}

/// A query for one artifact file.
///
/// An empty `classifier` means "no classifier"; there is no separate null state.
/// `version` is only optional so the same value can drive version listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRequest {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub version: Option<String>,
    pub extension: String,
    #[serde(default)]
    pub classifier: String,
}

impl ArtifactRequest {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: Some(version.into()),
            extension: extension.into(),
            classifier: String::new(),
        }
    }

    pub fn versionless(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            extension: extension.into(),
            classifier: String::new(),
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = classifier.into();
        self
    }

    pub fn has_classifier(&self) -> bool {
        !self.classifier.is_empty()
    }

    /// Returns the exact coordinate, failing when any part of the triple is missing.
    pub fn coordinate(&self) -> ApiResult<Coordinate> {
        self.require_versionless()?;
        let version = self
            .version
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::missing("version", "artifact request"))?;
        Ok(Coordinate::new(
            self.group_id.clone(),
            self.artifact_id.clone(),
            version,
        ))
    }

    /// Checks that group and artifact are present.
    pub fn require_versionless(&self) -> ApiResult<()> {
        if self.group_id.is_empty() {
            return Err(ApiError::missing("groupId", "artifact request"));
        }
        if self.artifact_id.is_empty() {
            return Err(ApiError::missing("artifactId", "artifact request"));
        }
        Ok(())
    }

    /// Parses `group:artifact[:extension[:classifier]]:version`.
    pub fn parse(input: &str) -> ApiResult<Self> {
        let parts: Vec<&str> = input.split(':').collect();
        let (head, version) = match parts.split_last() {
            Some((version, head)) if head.len() >= 2 && head.len() <= 4 => (head, *version),
            _ => {
                return Err(ApiError::InvalidCoordinate(format!(
                    "expected group:artifact[:extension[:classifier]]:version, got '{}'",
                    input
                )));
            }
        };
        let mut request = Self::from_parts(input, head)?;
        if version.is_empty() {
            return Err(ApiError::InvalidCoordinate(format!(
                "empty version in '{}'",
                input
            )));
        }
        request.version = Some(version.to_string());
        Ok(request)
    }

    /// Parses `group:artifact[:extension[:classifier]]`.
    pub fn parse_versionless(input: &str) -> ApiResult<Self> {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() < 2 || parts.len() > 4 {
            return Err(ApiError::InvalidCoordinate(format!(
                "expected group:artifact[:extension[:classifier]], got '{}'",
                input
            )));
        }
        Self::from_parts(input, &parts)
    }

    fn from_parts(input: &str, parts: &[&str]) -> ApiResult<Self> {
        if parts[0].is_empty() || parts[1].is_empty() {
            return Err(ApiError::InvalidCoordinate(format!(
                "group and artifact must not be empty in '{}'",
                input
            )));
        }
        let extension = parts
            .get(2)
            .filter(|e| !e.is_empty())
            .copied()
            .unwrap_or(DEFAULT_EXTENSION);
        let classifier = parts.get(3).copied().unwrap_or("");

        Ok(Self::versionless(parts[0], parts[1], extension).with_classifier(classifier))
    }
}

impl fmt::Display for ArtifactRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.group_id, self.artifact_id, self.extension
        )?;
        if self.has_classifier() {
            write!(f, ":{}", self.classifier)?;
        }
        if let Some(version) = &self.version {
            write!(f, ":{}", version)?;
        }
        Ok(())
    }
}
