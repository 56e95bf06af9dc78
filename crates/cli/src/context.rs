use crate::ContextArgs;
use embark_core::context::ExecutionRequest;
use tracing::info;

pub fn run(args: ContextArgs) -> Result<(), Box<dyn std::error::Error>> {
    let request = to_request(args);
    let context = embark_runtime::build_context(request)?;
    info!(
        "Effective local repository: {}",
        context.local_repository().basedir.display()
    );
    println!("{}", serde_json::to_string_pretty(context.as_ref())?);
    Ok(())
}

fn to_request(args: ContextArgs) -> ExecutionRequest {
    let mut request = ExecutionRequest::new().with_logging_level(args.log_level);
    if let Some(pom) = args.pom {
        request = request.with_pom(pom);
    }
    if let Some(path) = args.global_settings {
        request = request.with_global_settings(path);
    }
    if let Some(path) = args.user_settings {
        request = request.with_user_settings(path);
    }
    if let Some(path) = args.local_repo {
        request = request.with_local_repository(path);
    }
    if let Some(home) = args.engine_home {
        request = request.with_engine_home(home);
    }
    if args.offline {
        request = request.with_offline(true);
    }
    for (key, value) in args.define {
        request = request.with_user_property(key, value);
    }
    for id in args.profiles {
        let id = id.trim();
        match id.strip_prefix('!').or_else(|| id.strip_prefix('-')) {
            Some(inactive) => request = request.with_inactive_profile(inactive),
            None if !id.is_empty() => request = request.with_profile(id),
            None => {}
        }
    }
    request
}
