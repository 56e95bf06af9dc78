//! Settings resolution: loading, layering and interpolation.

mod interpolate;
pub mod loader;
pub mod merger;

pub use loader::JsonSettingsLoader;
pub use merger::{ConfigMerger, EffectiveSettings, SettingsRequest, merge_settings};
