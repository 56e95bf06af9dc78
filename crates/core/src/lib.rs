pub mod error;
pub mod logging;

pub mod context;
pub mod embedder;
pub mod installation;
pub mod reactor;
pub mod settings;

pub use error::Result;
