//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "hydrogpt=info";

/// Filter used while the terminal dashboard owns the screen.
pub const QUIET_FILTER: &str = "off";

/// Installs a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Calling this twice is harmless:
/// the second installation is ignored.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
