//! Workspace reactor: resolves artifacts from modules built in the same session.
//!
//! ```text
//! registerProject ──▶ CoordinateIndex (g:a:v, g:a → [v])
//!                            │
//! findArtifact ─────▶ lookup exact ──▶ ArtifactMatcher ──▶ location | none
//! findVersions ─────▶ lookup g:a   ──▶ ArtifactMatcher per version
//! ```

pub mod chain;
pub mod handlers;
pub mod index;
pub mod matcher;
pub mod resolver;

pub use chain::ChainedWorkspaceReader;
pub use handlers::StandardArtifactHandlers;
pub use index::CoordinateIndex;
pub use matcher::{ArtifactLocation, ArtifactMatcher, ConflictKey, LocationState};
pub use resolver::WorkspaceResolver;
