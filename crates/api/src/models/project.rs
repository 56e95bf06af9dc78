use super::coordinate::{Coordinate, versionless_key};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PACKAGING: &str = "jar";
pub const DESCRIPTOR_FILE_NAME: &str = "pom.xml";

fn default_packaging() -> String {
    DEFAULT_PACKAGING.to_string()
}

/// A secondary output of a module, such as sources or javadoc.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttachedArtifact {
    pub extension: String,
    #[serde(default)]
    pub classifier: String,
    pub file: PathBuf,
}

impl AttachedArtifact {
    pub fn new(
        extension: impl Into<String>,
        classifier: impl Into<String>,
        file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            extension: extension.into(),
            classifier: classifier.into(),
            file: file.into(),
        }
    }
}

/// Build-relevant facts about one module, as handed over by the project reader.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default = "default_packaging")]
    pub packaging: String,
    pub base_dir: PathBuf,
    /// The descriptor's own source file.
    pub file: PathBuf,
    /// Primary artifact output; unset until the module is built.
    #[serde(default)]
    pub artifact_file: Option<PathBuf>,
    #[serde(default)]
    pub attached_artifacts: Vec<AttachedArtifact>,
    /// Declared module sub-paths, relative to `base_dir`.
    #[serde(default)]
    pub modules: Vec<String>,
}

impl ProjectDescriptor {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        let base_dir = base_dir.into();
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            packaging: default_packaging(),
            file: base_dir.join(DESCRIPTOR_FILE_NAME),
            base_dir,
            artifact_file: None,
            attached_artifacts: Vec::new(),
            modules: Vec::new(),
        }
    }

    pub fn with_packaging(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = packaging.into();
        self
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = file.into();
        self
    }

    pub fn with_artifact_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.artifact_file = Some(file.into());
        self
    }

    pub fn with_attached(mut self, artifact: AttachedArtifact) -> Self {
        self.attached_artifacts.push(artifact);
        self
    }

    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules = modules.into_iter().map(Into::into).collect();
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(
            self.group_id.clone(),
            self.artifact_id.clone(),
            self.version.clone(),
        )
    }

    pub fn versionless_key(&self) -> String {
        versionless_key(&self.group_id, &self.artifact_id)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults() {
        let descriptor = ProjectDescriptor::new("g", "a", "1.0", "/work/a");
        assert_eq!(descriptor.packaging, "jar");
        assert_eq!(descriptor.file, PathBuf::from("/work/a/pom.xml"));
        assert!(descriptor.artifact_file.is_none());
        assert_eq!(descriptor.coordinate().to_string(), "g:a:1.0");
    }

    #[test]
    fn test_descriptor_deserializes_with_defaults() {
        let json = r#"{
            "groupId": "g",
            "artifactId": "a",
            "version": "1.0",
            "baseDir": "/work/a",
            "file": "/work/a/pom.xml",
            "attachedArtifacts": [
                { "extension": "jar", "classifier": "sources", "file": "/work/a/target/a-sources.jar" }
            ]
        }"#;
        let descriptor: ProjectDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.packaging, "jar");
        assert!(descriptor.modules.is_empty());
        assert_eq!(descriptor.attached_artifacts.len(), 1);
        assert_eq!(descriptor.attached_artifacts[0].classifier, "sources");
    }
}
