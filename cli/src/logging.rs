//! Tracing initialisation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates whose spans and events follow `--log-level`.
const CRATES: &[&str] = &[
    "vaultwatch",
    "vaultwatch_core",
    "vaultwatch_abi",
    "vaultwatch_ws",
    "vaultwatch_processor",
];

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// "trace" | "debug" | "info" | "warn" | "error"
    pub level: String,
    /// JSON structured logs instead of human-readable text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

/// Dependencies stay at `warn`; our crates use the configured level.
fn directives(level: &str) -> String {
    let mut out = String::from("warn");
    for krate in CRATES {
        out.push_str(&format!(",{krate}={level}"));
    }
    out
}

/// Install the global subscriber. `RUST_LOG`, when set, wins over `level`.
pub fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives(&config.level)))
        .unwrap_or_else(|_| EnvFilter::new(directives("info")));

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_every_crate() {
        let d = directives("debug");
        assert!(d.starts_with("warn,"));
        assert!(d.contains("vaultwatch_ws=debug"));
        assert!(d.contains("vaultwatch_processor=debug"));
        assert!(EnvFilter::try_new(&d).is_ok());
    }

    #[test]
    fn bad_level_is_rejected_by_the_filter() {
        assert!(EnvFilter::try_new(directives("loud")).is_err());
    }
}
