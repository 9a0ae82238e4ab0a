//! Flags shared by every `portico` subcommand.
//!
//! Flattened into [`super::Cli`] with `global = true`, so `portico -vv create`
//! and `portico create api -vv` mean the same thing.

use clap::Args;
use std::path::PathBuf;

/// Global arguments for all commands.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Increase logging verbosity.
    ///
    /// Pass once for INFO (`-v`), twice for DEBUG (`-vv`), three times for
    /// TRACE (`-vvv`).  Conflicts with `--quiet`.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Only warnings and errors
    -v      - Info level (pipeline steps)
    -vv     - Debug level (discovered services, commands run)
    -vvv    - Trace level (every directory visited)"
    )]
    pub verbose: u8,

    /// Suppress everything but errors and JSON results.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Disable ANSI colour codes; `NO_COLOR` (<https://no-color.org>) counts too.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Configuration file; must exist when given.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        env = "PORTICO_CONFIG",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,

    /// How results are printed.  `json` also switches log lines to JSON.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

impl GlobalArgs {
    /// Tracing level for the portico crates.  `--quiet` wins over `-v`.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Error chains are printed in full from `-v` upwards.
    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }
}

/// How the CLI should render its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human on a terminal, plain when piped.
    #[default]
    Auto,
    /// Colours, spinner, confirmation prompts.
    Human,
    /// No colours or spinner; stable for scripts.
    Plain,
    /// Results as pretty JSON on stdout.
    Json,
}

impl OutputFormat {
    /// Replace `Auto` by the concrete format for the given stdout.
    pub fn resolve(self, stdout_is_terminal: bool) -> Self {
        match self {
            Self::Auto if stdout_is_terminal => Self::Human,
            Self::Auto => Self::Plain,
            other => other,
        }
    }
}
