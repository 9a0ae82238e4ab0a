//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use portico_core::domain::EndpointStrategy;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "portico",
    bin_name = "portico",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "HTTP gateways for multi-service Go workspaces",
    long_about = "Portico generates a grpc-gateway service wired to every backend \
                  in the workspace that ships generated gateway stubs.",
    after_help = "EXAMPLES:\n\
        \x20 portico create api --namespace gw --remote github.com/acme/platform\n\
        \x20 portico discover --format json\n\
        \x20 portico completions bash > /usr/share/bash-completion/completions/portico",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate (or regenerate) a gateway service.
    #[command(
        visible_alias = "c",
        about = "Create a gateway service",
        after_help = "EXAMPLES:\n\
            \x20 portico create api --namespace gw\n\
            \x20 portico create api --endpoint fixed-service-dns --yes\n\
            \x20 portico create api --dry-run"
    )]
    Create(CreateArgs),

    /// List backends the gateway would be wired to.
    #[command(
        visible_alias = "ls",
        about = "List exposed backend services",
        after_help = "EXAMPLES:\n\
            \x20 portico discover\n\
            \x20 portico discover --include-default --format json"
    )]
    Discover(DiscoverArgs),

    /// Initialise a Portico configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 portico init           # platform config dir\n\
            \x20 portico init --local   # .portico.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 portico completions bash > ~/.local/share/bash-completion/completions/portico\n\
            \x20 portico completions zsh  > ~/.zfunc/_portico\n\
            \x20 portico completions fish > ~/.config/fish/completions/portico.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Portico configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 portico config get generation.endpoint\n\
            \x20 portico config list\n\
            \x20 portico config path"
    )]
    Config(ConfigCommands),
}

// ── shared workspace arguments ────────────────────────────────────────────────

/// Where the workspace lives and how backends are found.
#[derive(Debug, Clone, Args)]
pub struct WorkspaceArgs {
    /// Workspace root (holds `go.work`).
    #[arg(
        short = 'C',
        long = "root",
        value_name = "DIR",
        default_value = ".",
        help = "Workspace root directory"
    )]
    pub root: PathBuf,

    /// Services directory relative to the root.
    #[arg(
        long = "services-dir",
        value_name = "DIR",
        help = "Services directory (default from config: services)"
    )]
    pub services_dir: Option<String>,

    /// Also wire backends in the reserved namespace.
    #[arg(long = "include-default", help = "Do not skip the reserved namespace")]
    pub include_default: bool,
}

// ── create ────────────────────────────────────────────────────────────────────

/// Arguments for `portico create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Gateway name.  Reduced to ASCII letters (`user-api` becomes `userapi`).
    #[arg(value_name = "NAME", help = "Gateway service name")]
    pub name: String,

    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Namespace the gateway is generated in.
    #[arg(
        short = 'n',
        long = "namespace",
        value_name = "NAMESPACE",
        help = "Gateway namespace (default from config: gateway)"
    )]
    pub namespace: Option<String>,

    /// Module path prefix of the workspace, e.g. `github.com/acme/platform`.
    #[arg(
        short = 'r',
        long = "remote",
        value_name = "MODULE",
        env = "PORTICO_REMOTE",
        help = "Module path prefix of the workspace"
    )]
    pub remote: Option<String>,

    /// Container registry the workflow pushes to.
    #[arg(long = "registry", value_name = "REGISTRY", help = "Container registry")]
    pub registry: Option<String>,

    /// How handlers reach backend gRPC endpoints.
    #[arg(
        long = "endpoint",
        value_enum,
        value_name = "STRATEGY",
        help = "Endpoint strategy (default from config)"
    )]
    pub endpoint: Option<EndpointArg>,

    /// Match plain substrings of older templates instead of extension points.
    #[arg(long = "legacy-anchors", help = "Use legacy injection anchors")]
    pub legacy_anchors: bool,

    /// Fail instead of replacing an existing gateway.
    #[arg(long = "no-overwrite", help = "Fail if the gateway already exists")]
    pub no_overwrite: bool,

    /// Skip `go work use`.
    #[arg(long = "no-workspace", help = "Do not register the gateway in go.work")]
    pub no_workspace: bool,

    /// Use templates from disk instead of the built-in set.
    #[arg(
        long = "template-dir",
        value_name = "DIR",
        help = "Template root holding go/ and workflows/"
    )]
    pub template_dir: Option<PathBuf>,

    /// Preview what would be generated without writing any files.
    #[arg(long = "dry-run", help = "Show what would be generated")]
    pub dry_run: bool,

    /// Replace an existing gateway without asking.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation")]
    pub yes: bool,
}

/// CLI spelling of [`EndpointStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EndpointArg {
    /// Host read from a per-service config field.
    PerServiceConfig,
    /// Literal `<service>-svc.<namespace>` host.
    FixedServiceDns,
}

impl From<EndpointArg> for EndpointStrategy {
    fn from(arg: EndpointArg) -> Self {
        match arg {
            EndpointArg::PerServiceConfig => Self::PerServiceConfig,
            EndpointArg::FixedServiceDns => Self::FixedServiceDns,
        }
    }
}

// ── discover ──────────────────────────────────────────────────────────────────

/// Arguments for `portico discover`.
#[derive(Debug, Args)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `discover` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One module path per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `portico init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.portico.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `portico completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `portico config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `layout.proto_dir`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_create_command() {
        let cli = Cli::parse_from([
            "portico",
            "create",
            "api",
            "--namespace",
            "gw",
            "--endpoint",
            "fixed-service-dns",
            "--no-overwrite",
        ]);
        let Commands::Create(args) = cli.command else {
            panic!("expected Create command");
        };
        assert_eq!(args.name, "api");
        assert_eq!(args.namespace.as_deref(), Some("gw"));
        assert_eq!(args.endpoint, Some(EndpointArg::FixedServiceDns));
        assert!(args.no_overwrite);
        assert_eq!(args.workspace.root, PathBuf::from("."));
    }

    #[test]
    fn endpoint_arg_maps_to_strategy() {
        assert_eq!(
            EndpointStrategy::from(EndpointArg::PerServiceConfig),
            EndpointStrategy::PerServiceConfig
        );
        assert_eq!(
            EndpointStrategy::from(EndpointArg::FixedServiceDns),
            EndpointStrategy::FixedServiceDns
        );
    }

    #[test]
    fn discover_alias_and_format() {
        let cli = Cli::parse_from(["portico", "ls", "--format", "json", "-C", "/ws"]);
        let Commands::Discover(args) = cli.command else {
            panic!("expected Discover command");
        };
        assert_eq!(args.format, ListFormat::Json);
        assert_eq!(args.workspace.root, PathBuf::from("/ws"));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["portico", "--quiet", "--verbose", "discover"]);
        assert!(result.is_err());
    }
}
