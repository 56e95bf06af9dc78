pub mod building;
pub mod coordinate;
pub mod project;
pub mod settings;

pub use building::*;
pub use coordinate::*;
pub use project::*;
pub use settings::*;
