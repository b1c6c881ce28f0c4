//! Diagnostic logging.
//!
//! Everything goes to stderr; stdout carries only the status line. The
//! default level is `warn`, `--debug` raises this crate to `debug`, and
//! `RUST_LOG` overrides both.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,claude_costline={default_level}")));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(debug)
        .without_time()
        .compact();

    // A subscriber may already be installed (tests); keep the existing one
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}
