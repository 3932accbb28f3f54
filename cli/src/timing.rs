//! Tracing setup for the CLI.
//!
//! The library crates log through the `log` facade; those records reach the fmt layer through
//! tracing-subscriber's `tracing-log` bridge, so retry warnings show up next to CLI spans.
//!
//! With `--timing` every `#[instrument]`ed workflow (`list`, `load_page`, `flush`, ...) logs its
//! duration when the span closes.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Default level for the given flags. `RUST_LOG` still takes precedence.
fn default_level(verbose: bool, timing: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else if timing {
        // Span close events are logged at INFO level
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

/// Initialize the global subscriber.
///
/// # Arguments
/// * `verbose` - debug-level logging with targets
/// * `timing` - log span close events with duration
pub fn init_tracing(verbose: bool, timing: bool) {
    let mut filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose, timing).into())
        .from_env_lossy();

    // Keep connection-pool logs out of --verbose output
    for directive in ["hyper_util=warn", "reqwest=info"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    let span_events = if timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_level(true)
                .with_span_events(span_events)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
