//! Command handlers, one module per subcommand.

use portico_adapters::{
    DirectoryTemplates, EmbeddedTemplates, GoToolchain, LocalFilesystem, SimpleRenderer,
};
use portico_core::{
    application::{GatewayPorts, GatewayService, ports::TemplateSource},
    domain::PipelinePolicy,
};
use std::path::PathBuf;
use tracing::debug;

use crate::{cli::WorkspaceArgs, config::AppConfig, error::CliResult};

pub mod completions;
pub mod config;
pub mod create;
pub mod discover;
pub mod init;

/// Wire the production adapters into a [`GatewayService`].
pub(crate) fn gateway_service(
    config: &AppConfig,
    policy: PipelinePolicy,
    template_dir: Option<PathBuf>,
    go: GoToolchain,
) -> GatewayService {
    let templates: Box<dyn TemplateSource> =
        match template_dir.or_else(|| config.templates.local_path.clone()) {
            Some(dir) => {
                debug!(dir = %dir.display(), "Using templates from disk");
                Box::new(DirectoryTemplates::new(dir))
            }
            None => Box::new(EmbeddedTemplates::new()),
        };

    let ports = GatewayPorts {
        filesystem: Box::new(LocalFilesystem::new()),
        templates,
        renderer: Box::new(SimpleRenderer::new()),
        modules: Box::new(go.clone()),
        workspace: Box::new(go),
        probe: None,
    };
    GatewayService::new(ports, config.layout(), policy)
}

/// The configured `go` binary, or the one on `PATH`.
pub(crate) fn locate_go(config: &AppConfig) -> CliResult<GoToolchain> {
    match &config.toolchain.go_binary {
        Some(binary) => Ok(GoToolchain::with_binary(binary)),
        None => Ok(GoToolchain::locate()?),
    }
}

/// A toolchain handle for read-only commands; never invoked.
pub(crate) fn unused_go(config: &AppConfig) -> GoToolchain {
    GoToolchain::with_binary(
        config
            .toolchain
            .go_binary
            .clone()
            .unwrap_or_else(|| PathBuf::from("go")),
    )
}

/// Services directory from the flag, falling back to config.
pub(crate) fn services_dir<'a>(args: &'a WorkspaceArgs, config: &'a AppConfig) -> &'a str {
    args.services_dir
        .as_deref()
        .unwrap_or(config.project.services_dir.as_str())
}

/// Base policy from config with the workspace-level flag applied.
pub(crate) fn base_policy(args: &WorkspaceArgs, config: &AppConfig) -> PipelinePolicy {
    let mut policy = config.policy();
    if args.include_default {
        policy.skip_default_namespace = false;
    }
    policy
}
