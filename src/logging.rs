//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the level passed in:
//! ```bash
//! RUST_LOG=squarer=debug squarer --numbers 1,2,3 --threads 2
//! ```

use std::sync::Once;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: Once = Once::new();

/// Installs a stderr fmt layer filtered at `default_level`. Only the first
/// call has an effect.
pub fn init_with_level(default_level: &str) {
	INIT.call_once(|| {
		let filter = if std::env::var("RUST_LOG").is_ok() {
			EnvFilter::from_default_env()
		} else {
			EnvFilter::new(default_level)
		};

		let fmt_layer = tracing_subscriber::fmt::layer()
			.with_writer(std::io::stderr)
			.with_target(true)
			.with_thread_names(true)
			.with_filter(filter);

		tracing_subscriber::registry().with(fmt_layer).init();
	});
}

/// Quiet by default; warnings and errors only.
pub fn init() {
	init_with_level("warn");
}
