use embark_api::ProjectReader;
use embark_core::context::{
    ExecutionContext, ExecutionContextBuilder, ExecutionRequest, LoggingLevel, ProcessEnvironment,
};
use embark_core::embedder::Embedder;
use embark_core::reactor::{StandardArtifactHandlers, WorkspaceResolver};
use embark_core::settings::JsonSettingsLoader;
use std::sync::Arc;

/// A context builder wired to the current process and JSON settings files.
pub fn default_context_builder() -> ExecutionContextBuilder {
    ExecutionContextBuilder::with_collaborators(
        Arc::new(JsonSettingsLoader::new()),
        Arc::new(ProcessEnvironment::capture()),
    )
}

/// An empty reactor using the standard packaging table.
pub fn default_reactor() -> Arc<WorkspaceResolver> {
    Arc::new(WorkspaceResolver::new(Arc::new(
        StandardArtifactHandlers::new(),
    )))
}

pub fn build_context(request: ExecutionRequest) -> embark_core::Result<Arc<ExecutionContext>> {
    default_context_builder().build(request)
}

/// Bootstraps a build session: one context, one empty reactor, and the
/// caller's project reader.
pub fn build_embedder(
    request: ExecutionRequest,
    reader: Arc<dyn ProjectReader>,
) -> embark_core::Result<Embedder> {
    let context = build_context(request)?;
    let embedder = Embedder::new(context, default_reactor(), reader);
    tracing::info!(
        base_directory = %embedder.context().base_directory().display(),
        external_workspace = embedder.context().workspace_reader().is_some(),
        "Build session ready"
    );
    Ok(embedder)
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, level: LoggingLevel, to_stderr: bool) -> Option<impl Drop> {
    if level == LoggingLevel::Disabled {
        return None;
    }
    Some(embark_core::logging::init_logging(component, level, to_stderr))
}
