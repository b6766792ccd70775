//! Store settings
//!
//! Settings loaded from .glacier.toml file.

use serde::{Deserialize, Serialize};

/// Store settings loaded from .glacier.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Publish every committed state to subscribers
    #[serde(default)]
    pub use_observables: bool,

    /// Register the logging middleware in front of the chain
    #[serde(default = "default_log_actions")]
    pub log_actions: bool,

    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_actions() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            use_observables: false,
            log_actions: default_log_actions(),
            log_level: default_log_level(),
        }
    }
}

impl StoreSettings {
    /// Load settings from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        match crate::load_config_file() {
            Some(source) => {
                log::info!("Using store settings from {}", source.path.display());
                Self::parse(&source.content)
            }
            None => {
                log::debug!("Using default store settings");
                Self::default()
            }
        }
    }

    /// Parse settings from TOML content, falling back to defaults on error
    pub fn parse(content: &str) -> Self {
        match toml::from_str(content) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse settings file: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = StoreSettings::default();
        assert!(!settings.use_observables);
        assert!(settings.log_actions);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_settings_deserialize() {
        let toml = r#"
            use_observables = true
            log_actions = false
            log_level = "debug"
        "#;
        let settings: StoreSettings = toml::from_str(toml).unwrap();
        assert!(settings.use_observables);
        assert!(!settings.log_actions);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let toml = r#"
            use_observables = true
        "#;
        let settings: StoreSettings = toml::from_str(toml).unwrap();
        assert!(settings.use_observables);
        // Other fields should use defaults
        assert!(settings.log_actions);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_parse_invalid_falls_back_to_default() {
        let settings = StoreSettings::parse("use_observables = \"sometimes\"");
        assert_eq!(settings, StoreSettings::default());
    }
}
