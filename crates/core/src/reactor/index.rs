//! Coordinate index over the modules known to one reactor build.
//!
//! Two views are kept in step: an exact `group:artifact:version` map and a
//! `group:artifact` map listing every known version. Absence is never an error.

use embark_api::{Coordinate, ProjectDescriptor};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default, Clone)]
pub struct CoordinateIndex {
    by_coordinate: HashMap<Coordinate, Arc<ProjectDescriptor>>,
    /// Versions in registration order; no semantic-version ordering.
    by_versionless: HashMap<String, Vec<Arc<ProjectDescriptor>>>,
}

impl CoordinateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for the descriptor's exact coordinate.
    ///
    /// Re-registering a coordinate updates its slot in the version list in place.
    /// Returns the descriptor previously held for that coordinate.
    pub fn register(&mut self, descriptor: Arc<ProjectDescriptor>) -> Option<Arc<ProjectDescriptor>> {
        let previous = self
            .by_coordinate
            .insert(descriptor.coordinate(), Arc::clone(&descriptor));

        let versions = self
            .by_versionless
            .entry(descriptor.versionless_key())
            .or_default();
        match versions.iter_mut().find(|d| d.version == descriptor.version) {
            Some(slot) => *slot = descriptor,
            None => versions.push(descriptor),
        }

        previous
    }

    pub fn lookup_exact(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Option<&Arc<ProjectDescriptor>> {
        self.by_coordinate
            .get(&Coordinate::new(group_id, artifact_id, version))
    }

    pub fn lookup_all_versions(&self, group_id: &str, artifact_id: &str) -> &[Arc<ProjectDescriptor>] {
        self.by_versionless
            .get(&embark_api::versionless_key(group_id, artifact_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn coordinates(&self) -> impl Iterator<Item = &Coordinate> {
        self.by_coordinate.keys()
    }

    pub fn len(&self) -> usize {
        self.by_coordinate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_coordinate.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(version: &str) -> Arc<ProjectDescriptor> {
        Arc::new(ProjectDescriptor::new("g", "a", version, format!("/work/a-{}", version)))
    }

    #[test]
    fn test_register_and_lookup_exact() {
        let mut index = CoordinateIndex::new();
        assert!(index.register(descriptor("1.0")).is_none());

        let found = index.lookup_exact("g", "a", "1.0").unwrap();
        assert_eq!(found.version, "1.0");
        assert!(index.lookup_exact("g", "a", "2.0").is_none());
        assert!(index.lookup_exact("g", "b", "1.0").is_none());
    }

    #[test]
    fn test_all_versions_in_registration_order() {
        let mut index = CoordinateIndex::new();
        index.register(descriptor("2.0"));
        index.register(descriptor("1.0"));
        index.register(descriptor("1.1"));

        let versions: Vec<_> = index
            .lookup_all_versions("g", "a")
            .iter()
            .map(|d| d.version.as_str())
            .collect();
        assert_eq!(versions, vec!["2.0", "1.0", "1.1"]);
        assert!(index.lookup_all_versions("g", "missing").is_empty());
    }

    #[test]
    fn test_reregister_replaces_in_place() {
        let mut index = CoordinateIndex::new();
        index.register(descriptor("1.0"));
        index.register(descriptor("2.0"));

        let rebuilt = Arc::new(
            ProjectDescriptor::new("g", "a", "1.0", "/work/a-1.0")
                .with_artifact_file("/work/a-1.0/target/a-1.0.jar"),
        );
        let previous = index.register(rebuilt).unwrap();
        assert!(previous.artifact_file.is_none());

        assert_eq!(index.len(), 2);
        let versions = index.lookup_all_versions("g", "a");
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].version, "1.0");
        assert!(versions[0].artifact_file.is_some());
        assert!(
            index
                .lookup_exact("g", "a", "1.0")
                .unwrap()
                .artifact_file
                .is_some()
        );
    }
}
