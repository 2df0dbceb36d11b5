use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogConfig;

/// Install the global `tracing` subscriber. `RUST_LOG` takes precedence
/// over the configured level. Calling this twice is a no-op.
pub fn init_tracing(cfg: &LogConfig) {
    let level = match cfg.level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "error" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let base = fmt::layer().with_target(true).with_writer(std::io::stderr);
    let fmt_layer = if cfg.format.eq_ignore_ascii_case("json") {
        base.json().boxed()
    } else {
        base.boxed()
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
