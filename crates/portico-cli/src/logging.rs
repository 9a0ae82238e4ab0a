//! Tracing subscriber initialisation.
//!
//! Only the CLI crate installs a subscriber; `portico-core` and
//! `portico-adapters` only emit spans and events.
//!
//! Events always go to stderr so stdout stays reserved for command results.
//! With `--output-format json` they are written as JSON lines as well, which
//! lets a CI job parse both streams.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{GlobalArgs, OutputFormat};

/// Crates whose events pass the default filter.
const PORTICO_TARGETS: [&str; 3] = ["portico", "portico_core", "portico_adapters"];

/// Subscriber settings derived from the global flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    level: &'static str,
    ansi: bool,
    json: bool,
}

impl LogSettings {
    pub fn from_args(args: &GlobalArgs) -> Self {
        Self::resolve(args, std::io::stderr().is_terminal())
    }

    fn resolve(args: &GlobalArgs, stderr_is_terminal: bool) -> Self {
        let json = args.output_format == OutputFormat::Json;
        Self {
            level: args.log_level(),
            // escape codes would corrupt JSON lines
            ansi: !json && !args.no_color && stderr_is_terminal,
            json,
        }
    }

    /// Filter used when `RUST_LOG` is unset.
    fn directives(&self) -> String {
        PORTICO_TARGETS
            .iter()
            .map(|target| format!("{target}={}", self.level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the global subscriber.  Call once, before any event fires.
pub fn init_logging(settings: &LogSettings) -> anyhow::Result<()> {
    // RUST_LOG wins over -v/-q.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.directives()));

    let human = (!settings.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(settings.ansi)
            .with_writer(std::io::stderr)
    });
    let json = settings.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr)
    });

    // try_init rather than init: a second call is an error, not a panic.
    tracing_subscriber::registry()
        .with(filter)
        .with(human)
        .with(json)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}
