//! Settings for glacier stores
//!
//! This crate provides:
//! - Settings file lookup (TOML)
//! - Store settings (StoreSettings)

pub mod config_file;
pub mod store_settings;

pub use config_file::{load_config_file, ConfigSource};
pub use store_settings::StoreSettings;
