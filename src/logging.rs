//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Log lines go to stderr; stdout is reserved for command output (the
//! inventory printed by `check`, the page printed by `render`).
//!
//! # Levels
//!
//! - `warn` (default): a section degraded (store failure, missed deadline,
//!   skipped document)
//! - `info` (`-v`): stage progress and summary counts
//! - `debug` (`-vv`): queries, cache decisions, arrival order
//! - `trace` (`-vvv`): discarded late results
//!
//! `RUST_LOG` overrides the verbosity flags when set.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub with_target: bool,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_target: false,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// Map the `-v` count to a level.
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            // Module paths only help once there is a lot of output.
            with_target: verbosity >= 2,
            ..Self::default()
        }
    }

    /// Filter directive for this crate plus a quieter default for
    /// dependencies.
    pub fn directive(&self) -> String {
        let deps = if self.level >= Level::DEBUG { "info" } else { "warn" };
        format!(
            "{deps},urban_site={}",
            self.level.as_str().to_ascii_lowercase()
        )
    }
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directive()))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(config: &LogConfig) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.with_target)
        .with_ansi(config.with_ansi)
        .without_time()
        .compact();
    let _ = tracing_subscriber::registry()
        .with(build_filter(config))
        .with(layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(LogConfig::from_verbosity(0).level, Level::WARN);
        assert_eq!(LogConfig::from_verbosity(1).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(2).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(9).level, Level::TRACE);
    }

    #[test]
    fn directive_scopes_crate_level() {
        assert_eq!(LogConfig::from_verbosity(1).directive(), "warn,urban_site=info");
        assert_eq!(LogConfig::from_verbosity(3).directive(), "info,urban_site=trace");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logging(&LogConfig::default());
        init_logging(&LogConfig::default());
    }
}
