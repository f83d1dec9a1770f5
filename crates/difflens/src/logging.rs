#![forbid(unsafe_code)]

//! Log subscriber setup for the binary.
//!
//! Events go to stderr so they never mix with the rendered diff on stdout.
//! The filter comes from `DIFFLENS_LOG` (`tracing_subscriber` directive
//! syntax, e.g. `difflens_core=debug`) and defaults to `warn`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const ENV_LOG: &str = "DIFFLENS_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

/// Build the filter from a directive string, falling back to `warn`.
#[must_use]
pub fn filter_from(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed.
pub fn init() -> bool {
    let directive = std::env::var(ENV_LOG).ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(filter_from(directive.as_deref()))
        .try_init()
        .is_ok()
}
