//! Avatar stack preview CLI
//!
//! Loads TOML scene descriptions, composes them with `avatar-stack-core` and
//! rasterizes them with `avatar-stack-overlay`.

pub mod commands;
pub mod logging;
pub mod preferences;
pub mod scene;

pub use commands::{BatchReport, CommandError, RenderOptions};
pub use preferences::ConfigError;
pub use scene::{Scene, SceneError};
