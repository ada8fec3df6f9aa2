//! Logging utilities and structured logging support
//!
//! The library only emits records through the `log` facade. Binaries call
//! [`init`] or [`init_with_level`] once at startup to install `env_logger`.

pub use log::{debug, error, info, trace, warn, LevelFilter};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a default level
///
/// `level` applies only when `RUST_LOG` is unset or empty; otherwise the
/// environment filter is used as is. Calling this more than once is
/// harmless; later calls are ignored.
pub fn init_with_level(level: LevelFilter) {
    let env_filter = std::env::var("RUST_LOG").ok();
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = fallback_level(env_filter.as_deref(), level) {
        builder.filter_level(level);
    }
    let _ = builder.format_timestamp_millis().try_init();
}

fn fallback_level(env_filter: Option<&str>, level: LevelFilter) -> Option<LevelFilter> {
    match env_filter {
        Some(filter) if !filter.trim().is_empty() => None,
        _ => Some(level),
    }
}

/// Parse a level name such as `"info"` or `"trace"`
///
/// Unknown names fall back to [`LevelFilter::Info`].
pub fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Info)
}
