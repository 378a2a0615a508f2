// tests/logging_filters.rs

use blocktask::cli::LogLevel;
use blocktask::logging::DEFAULT_DIRECTIVES;
use tracing_subscriber::EnvFilter;

#[test]
fn default_directives_parse() {
    assert!(EnvFilter::try_new(DEFAULT_DIRECTIVES).is_ok());
}

#[test]
fn cli_levels_map_to_directives() {
    assert_eq!(LogLevel::Error.directive(), "error");
    assert_eq!(LogLevel::Warn.directive(), "warn");
    assert_eq!(LogLevel::Trace.directive(), "trace");

    for level in [LogLevel::Error, LogLevel::Info, LogLevel::Debug] {
        let directives = format!("blocktask={},warn", level.directive());
        assert!(EnvFilter::try_new(&directives).is_ok(), "{directives}");
    }
}
