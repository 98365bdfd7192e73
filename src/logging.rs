//! Logging configuration for the preview CLI.
//!
//! Logs go to stderr so rendered output and `describe` text on stdout stay
//! clean. Set `DEBUG_LOGGING=1` to enable debug output for the avatar stack
//! crates; `RUST_LOG` overrides both.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Initialize the global subscriber. Safe to call more than once.
pub fn init() {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(debug_logging)));

    if tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .try_init()
        .is_ok()
    {
        tracing::debug!(debug_logging, "logging initialized");
    }
}

/// Filter used when `RUST_LOG` is not set
pub fn filter_directive(debug_logging: bool) -> &'static str {
    if debug_logging {
        // Debug for our crates, info for dependencies
        "info,avatar_stack=debug,avatar_stack_core=debug,avatar_stack_overlay=debug"
    } else {
        "info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(false), "info");
        let debug = filter_directive(true);
        assert!(debug.contains("avatar_stack_core=debug"));
        assert!(EnvFilter::try_new(debug).is_ok());
    }
}
