//! Configuration loading, validation and persistence.

pub mod settings;

pub use settings::{ConfigError, Settings};
