use crate::ReactorArgs;
use embark_api::{ArtifactRequest, ProjectDescriptor};
use embark_core::reactor::WorkspaceResolver;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub fn run(args: ReactorArgs) -> Result<(), Box<dyn std::error::Error>> {
    let reactor = load(&args.descriptors)?;

    let output = match (args.find, args.versions) {
        (Some(coordinate), _) => {
            let request = ArtifactRequest::parse(&coordinate)?;
            serde_json::to_string_pretty(&reactor.find_artifact(&request)?)?
        }
        (None, Some(coordinate)) => {
            let request = ArtifactRequest::parse_versionless(&coordinate)?;
            serde_json::to_string_pretty(&reactor.find_versions(&request)?)?
        }
        (None, None) => return Err("either --find or --versions is required".into()),
    };
    println!("{}", output);
    Ok(())
}

fn load(path: &Path) -> Result<Arc<WorkspaceResolver>, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let descriptors: Vec<ProjectDescriptor> = serde_json::from_str(&content)?;

    let reactor = embark_runtime::default_reactor();
    for descriptor in descriptors {
        reactor.register_project(descriptor);
    }
    info!("Loaded {} reactor modules from {}", reactor.len(), path.display());
    Ok(reactor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_descriptors() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("modules.json");
        fs::write(
            &path,
            r#"[
                { "groupId": "org.acme", "artifactId": "core", "version": "1.0",
                  "baseDir": "/src/core", "file": "/src/core/pom.xml" },
                { "groupId": "org.acme", "artifactId": "core", "version": "1.1",
                  "baseDir": "/src/core", "file": "/src/core/pom.xml",
                  "artifactFile": "/src/core/target/core-1.1.jar" }
            ]"#,
        )
        .unwrap();

        let reactor = load(&path).unwrap();
        assert_eq!(reactor.len(), 2);
        let versions = reactor
            .find_versions(&ArtifactRequest::parse_versionless("org.acme:core").unwrap())
            .unwrap();
        assert_eq!(versions, vec!["1.0", "1.1"]);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("modules.json");
        fs::write(&path, "{}").unwrap();
        assert!(load(&path).is_err());
    }
}
