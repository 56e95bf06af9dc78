use embark_api::{ApiError, ApiResult, ProjectBuildingRequest, ProjectDescriptor, ProjectReader};
use embark_core::context::{
    ExecutionContext, ExecutionContextBuilder, ExecutionRequest, ProcessEnvironment,
};
use embark_core::settings::JsonSettingsLoader;
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptorFile {
    group_id: String,
    artifact_id: String,
    version: String,
    #[serde(default)]
    packaging: Option<String>,
    #[serde(default)]
    modules: Vec<String>,
}

/// Reads descriptors written as small JSON documents.
#[derive(Default)]
pub struct JsonProjectReader {
    reads: AtomicUsize,
    cancel_after: Option<(usize, CancellationToken)>,
}

#[allow(dead_code)]
impl JsonProjectReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel `token` once `reads` descriptors have been read.
    pub fn cancelling_after(reads: usize, token: CancellationToken) -> Self {
        Self {
            reads: AtomicUsize::new(0),
            cancel_after: Some((reads, token)),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ProjectReader for JsonProjectReader {
    fn read(&self, file: &Path, _request: &ProjectBuildingRequest) -> ApiResult<ProjectDescriptor> {
        let failed = |message: String| ApiError::ProjectRead {
            path: file.to_path_buf(),
            message,
        };
        let content = fs::read_to_string(file).map_err(|e| failed(e.to_string()))?;
        let raw: DescriptorFile = serde_json::from_str(&content).map_err(|e| failed(e.to_string()))?;

        let reads = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((limit, token)) = &self.cancel_after {
            if reads >= *limit {
                token.cancel();
            }
        }

        let base_dir = file.parent().unwrap_or(Path::new("/")).to_path_buf();
        let mut descriptor = ProjectDescriptor::new(raw.group_id, raw.artifact_id, raw.version, base_dir)
            .with_file(file)
            .with_modules(raw.modules);
        if let Some(packaging) = raw.packaging {
            descriptor = descriptor.with_packaging(packaging);
        }
        Ok(descriptor)
    }
}

#[allow(dead_code)]
pub fn write_descriptor(path: &Path, artifact_id: &str, packaging: &str, modules: &[&str]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let document = json!({
        "groupId": "org.acme",
        "artifactId": artifact_id,
        "version": "1.0",
        "packaging": packaging,
        "modules": modules,
    });
    fs::write(path, serde_json::to_string_pretty(&document).unwrap()).unwrap();
}

/// A context rooted at `root` that never looks at the real home directory.
#[allow(dead_code)]
pub fn context_for(root: &Path, request: ExecutionRequest) -> Arc<ExecutionContext> {
    let environment = ProcessEnvironment::isolated(Some(root.join("home")), root);
    ExecutionContextBuilder::with_collaborators(
        Arc::new(JsonSettingsLoader::new()),
        Arc::new(environment),
    )
    .build(
        request
            .with_base_directory(root)
            .with_local_repository(root.join("repo")),
    )
    .unwrap()
}
