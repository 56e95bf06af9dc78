use embark_api::ArtifactHandlers;
use std::collections::HashMap;

/// Packaging-to-extension table for the packagings a stock engine ships with.
#[derive(Debug, Clone)]
pub struct StandardArtifactHandlers {
    extensions: HashMap<String, String>,
}

impl StandardArtifactHandlers {
    pub fn new() -> Self {
        let extensions = [
            ("pom", "pom"),
            ("jar", "jar"),
            ("test-jar", "jar"),
            ("maven-plugin", "jar"),
            ("ejb", "jar"),
            ("ejb-client", "jar"),
            ("java-source", "jar"),
            ("javadoc", "jar"),
            ("bundle", "jar"),
            ("war", "war"),
            ("ear", "ear"),
            ("rar", "rar"),
        ]
        .into_iter()
        .map(|(packaging, extension)| (packaging.to_string(), extension.to_string()))
        .collect();

        Self { extensions }
    }

    /// Add or override the extension for a packaging.
    pub fn with_handler(mut self, packaging: impl Into<String>, extension: impl Into<String>) -> Self {
        self.extensions.insert(packaging.into(), extension.into());
        self
    }
}

impl Default for StandardArtifactHandlers {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactHandlers for StandardArtifactHandlers {
    fn extension(&self, packaging: &str) -> Option<String> {
        self.extensions.get(packaging).cloned()
    }
}
