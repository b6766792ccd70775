//! Terminal logging using simplelog
//!
//! The level comes from RUST_LOG when set, otherwise from the store settings.

use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Resolve the effective level: RUST_LOG first, then the configured fallback
fn level_from(env_level: Option<&str>, fallback: &str) -> LevelFilter {
    env_level
        .and_then(parse_level)
        .or_else(|| parse_level(fallback))
        .unwrap_or(LevelFilter::Info)
}

/// Initialize terminal logging on stderr at RUST_LOG, or info
///
/// Called before the settings are loaded so their log lines are not lost.
/// [`apply_settings_level`] narrows or widens the level afterwards.
pub fn init() -> anyhow::Result<()> {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|c| c) // Fallback if local time offset fails
        .build();

    // The logger itself passes everything; the global max level does the filtering
    TermLogger::init(LevelFilter::Trace, config, TerminalMode::Stderr, ColorChoice::Auto)?;
    log::set_max_level(effective_level("info"));
    Ok(())
}

/// Switch to the level from the settings unless RUST_LOG overrides it
pub fn apply_settings_level(configured: &str) {
    let level = effective_level(configured);
    log::set_max_level(level);
    log::debug!("Log level set to {}", level);
}

fn effective_level(fallback: &str) -> LevelFilter {
    let env_level = std::env::var("RUST_LOG").ok();
    level_from(env_level.as_deref(), fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_level_wins() {
        assert_eq!(level_from(Some("trace"), "info"), LevelFilter::Trace);
    }

    #[test]
    fn test_fallback_used_for_unknown_env_level() {
        assert_eq!(level_from(Some("chatty"), "warn"), LevelFilter::Warn);
        assert_eq!(level_from(None, "DEBUG"), LevelFilter::Debug);
    }

    #[test]
    fn test_defaults_to_info() {
        assert_eq!(level_from(None, "nonsense"), LevelFilter::Info);
    }

    // The only test installing the global logger
    #[test]
    fn test_logger_ready_before_settings_level_applied() {
        init().unwrap();
        assert_eq!(log::max_level(), effective_level("info"));

        apply_settings_level("warn");
        assert_eq!(log::max_level(), effective_level("warn"));
    }
}
