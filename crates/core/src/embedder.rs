//! Build session host: discovers the modules of a reactor and hands the
//! session over to an external build engine.

use crate::context::ExecutionContext;
use crate::error::{EmbarkError, Result};
use crate::reactor::{ChainedWorkspaceReader, WorkspaceResolver};
use async_trait::async_trait;
use embark_api::{
    ApiResult, Coordinate, DESCRIPTOR_FILE_NAME, ProjectDescriptor, ProjectReader, WorkspaceReader,
};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub const DEFAULT_INCLUDE: &str = "**/pom.xml";

/// The lifecycle executor driven by an [`Embedder`].
#[async_trait]
pub trait BuildEngine: Send + Sync {
    async fn execute(
        &self,
        context: Arc<ExecutionContext>,
        workspace: Arc<dyn WorkspaceReader>,
    ) -> ApiResult<ExecutionResult>;
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildFailure {
    pub project: Coordinate,
    pub message: String,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub built: Vec<Coordinate>,
    pub failures: Vec<BuildFailure>,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One build session: a context, the reactor it fills, and the reader that
/// produces descriptors.
pub struct Embedder {
    context: Arc<ExecutionContext>,
    reactor: Arc<WorkspaceResolver>,
    reader: Arc<dyn ProjectReader>,
}

impl Embedder {
    pub fn new(
        context: Arc<ExecutionContext>,
        reactor: Arc<WorkspaceResolver>,
        reader: Arc<dyn ProjectReader>,
    ) -> Self {
        Self {
            context,
            reactor,
            reader,
        }
    }

    pub fn context(&self) -> &Arc<ExecutionContext> {
        &self.context
    }

    pub fn reactor(&self) -> &Arc<WorkspaceResolver> {
        &self.reactor
    }

    /// The reader handed to the build engine: the reactor alone, or the
    /// reactor in front of the caller's own workspace reader.
    pub fn workspace_reader(&self) -> Arc<dyn WorkspaceReader> {
        match self.context.workspace_reader() {
            Some(external) => Arc::new(ChainedWorkspaceReader::new(
                Arc::clone(&self.reactor),
                Arc::clone(external),
            )),
            None => Arc::clone(&self.reactor) as Arc<dyn WorkspaceReader>,
        }
    }

    /// Read one descriptor and register it with the reactor.
    pub fn read_project(&self, pom: &Path) -> Result<Arc<ProjectDescriptor>> {
        let file = self.resolve(pom);
        let request = self.context.project_building_request();
        let descriptor = self.reader.read(&file, &request)?;
        Ok(self.reactor.register_project(descriptor))
    }

    /// Read `pom` and, when `recursive`, every module it declares, breadth first.
    pub fn read_projects(&self, pom: &Path, recursive: bool) -> Result<Vec<Arc<ProjectDescriptor>>> {
        let mut queue = VecDeque::from([self.resolve(pom)]);
        let mut visited = HashSet::new();
        let mut projects = Vec::new();

        while let Some(file) = queue.pop_front() {
            if self.context.is_cancelled() {
                warn!("Project discovery cancelled before {}", file.display());
                return Err(EmbarkError::Cancelled);
            }
            if !visited.insert(file.clone()) {
                continue;
            }

            let descriptor = self.read_project(&file)?;
            if recursive {
                for module in &descriptor.modules {
                    queue.push_back(module_file(descriptor.base_dir(), module));
                }
            }
            projects.push(descriptor);
        }

        info!(count = projects.len(), "Read reactor projects");
        Ok(projects)
    }

    /// Read every descriptor under `basedir` whose relative path matches an
    /// include pattern and no exclude pattern. Without includes, every
    /// `pom.xml` is read.
    pub fn collect_projects(
        &self,
        basedir: &Path,
        includes: &[String],
        excludes: &[String],
    ) -> Result<Vec<Arc<ProjectDescriptor>>> {
        let basedir = self.resolve(basedir);
        let includes = if includes.is_empty() {
            build_glob_set(&[DEFAULT_INCLUDE.to_string()])?
        } else {
            build_glob_set(includes)?
        };
        let excludes = build_glob_set(excludes)?;

        let mut files: Vec<PathBuf> = WalkDir::new(&basedir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| {
                let relative = path.strip_prefix(&basedir).unwrap_or(path);
                includes.is_match(relative) && !excludes.is_match(relative)
            })
            .collect();
        files.sort();
        debug!(
            basedir = %basedir.display(),
            matched = files.len(),
            "Collected descriptor files"
        );

        let mut projects = Vec::with_capacity(files.len());
        for file in files {
            if self.context.is_cancelled() {
                return Err(EmbarkError::Cancelled);
            }
            projects.push(self.read_project(&file)?);
        }
        Ok(projects)
    }

    /// Run the engine against this session. Cancelling the context ends the
    /// wait with [`EmbarkError::Cancelled`].
    pub async fn execute(&self, engine: &dyn BuildEngine) -> Result<ExecutionResult> {
        if self.context.is_cancelled() {
            return Err(EmbarkError::Cancelled);
        }

        let token = self.context.cancellation_token().clone();
        let workspace = self.workspace_reader();
        info!(
            goals = ?self.context.goals(),
            projects = self.reactor.len(),
            "Starting build"
        );

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(EmbarkError::Cancelled),
            result = engine.execute(Arc::clone(&self.context), workspace) => result?,
        };

        if result.is_success() {
            info!(built = result.built.len(), "Build finished");
        } else {
            warn!(
                built = result.built.len(),
                failed = result.failures.len(),
                "Build finished with failures"
            );
        }
        Ok(result)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        normalize(&self.context.base_directory().join(path))
    }
}

/// A module path naming an existing file is that file; otherwise it is a
/// directory holding `pom.xml`.
fn module_file(base_dir: &Path, module: &str) -> PathBuf {
    let path = normalize(&base_dir.join(module));
    if path.is_file() {
        path
    } else {
        path.join(DESCRIPTOR_FILE_NAME)
    }
}

/// Lexically drop `.` and `..` so `app/../core` and `core` are one module.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
