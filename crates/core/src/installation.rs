//! Identifies the engine installed under an engine home.
//!
//! The version is read from the `pom.properties` the core jar carries under
//! `<home>/lib`.

use crate::error::{EmbarkError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::ZipArchive;

pub const LIB_DIRECTORY: &str = "lib";
pub const CORE_POM_PROPERTIES: &str = "META-INF/maven/org.apache.maven/maven-core/pom.properties";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EngineInformation {
    pub version: String,
    /// `jar:file:<jar>!/<entry>` of the properties the version was read from.
    pub version_resource_path: String,
}

/// Read the engine version from the jars under `<engine_home>/lib`.
///
/// Jars are scanned in file-name order; the first one holding the core
/// properties wins.
pub fn detect(engine_home: &Path) -> Result<EngineInformation> {
    let invalid = |message: &str| EmbarkError::EngineHome {
        path: engine_home.to_path_buf(),
        message: message.to_string(),
    };

    if !engine_home.is_dir() {
        return Err(invalid("directory does not exist"));
    }
    let lib = engine_home.join(LIB_DIRECTORY);
    if !lib.is_dir() {
        return Err(invalid("no lib directory"));
    }

    let mut jars: Vec<PathBuf> = fs::read_dir(&lib)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "jar"))
        .collect();
    jars.sort();

    for jar in jars {
        let Some(content) = read_entry(&jar, CORE_POM_PROPERTIES)? else {
            continue;
        };
        let properties = parse_properties(&content);
        let version = properties
            .get("version")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| invalid("core pom.properties has no version"))?;

        info!(version = %version, jar = %jar.display(), "Detected engine version");
        return Ok(EngineInformation {
            version: version.clone(),
            version_resource_path: format!("jar:file:{}!/{}", jar.display(), CORE_POM_PROPERTIES),
        });
    }

    Err(invalid("no core pom.properties found in lib"))
}

fn read_entry(jar: &Path, name: &str) -> Result<Option<String>> {
    let mut archive = ZipArchive::new(File::open(jar)?)?;
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            debug!("{} has no {}", jar.display(), name);
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(Some(content))
}

/// `key=value` / `key: value` lines; `#` and `!` start comments.
fn parse_properties(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let split = line.find(['=', ':'])?;
            Some((
                line[..split].trim().to_string(),
                line[split + 1..].trim().to_string(),
            ))
        })
        .collect()
}
