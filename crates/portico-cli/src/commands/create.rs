//! `portico create` command handler.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use portico_core::{
    application::CreateReport,
    domain::{AnchorStyle, PipelinePolicy, PlaceholderSet, ServiceInfo},
};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    cli::CreateArgs,
    commands::{base_policy, gateway_service, locate_go, services_dir, unused_go},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    placeholders::GatewayRequest,
};

/// What a dry run would do.
#[derive(Debug, Serialize)]
struct CreatePlan<'a> {
    target: PathBuf,
    exists: bool,
    services: &'a [ServiceInfo],
    replaces: Vec<Replacement<'a>>,
    workflow: String,
}

#[derive(Debug, Serialize)]
struct Replacement<'a> {
    module: &'a str,
    path: String,
}

/// Execute the create command.
#[instrument(skip_all, fields(name = %args.name))]
pub fn execute(args: CreateArgs, output: &OutputManager, config: &AppConfig) -> CliResult<()> {
    let namespace = args
        .namespace
        .clone()
        .unwrap_or_else(|| config.project.namespace.clone());
    let remote = args
        .remote
        .clone()
        .unwrap_or_else(|| config.project.remote.clone());
    let registry = args
        .registry
        .clone()
        .unwrap_or_else(|| config.project.registry.clone());

    let placeholders = GatewayRequest {
        root: &args.workspace.root,
        name: &args.name,
        namespace: &namespace,
        services_dir: services_dir(&args.workspace, config),
        remote: &remote,
        registry: &registry,
        branch: &config.project.branch,
        version: &config.project.version,
    }
    .placeholders()?;

    let policy = policy_for(&args, config);
    let target = args
        .workspace
        .root
        .join(placeholders.service_directory());
    let exists = target.exists();
    debug!(target = %target.display(), exists, "Resolved gateway target");

    if args.dry_run {
        return dry_run(&args, output, config, policy, &placeholders, target, exists);
    }

    if exists && policy.overwrite && !args.yes && !output.is_quiet() {
        confirm_replace(&target)?;
    }

    let go = locate_go(config)?;
    debug!(go = %go.binary().display(), "Using go toolchain");
    let service = gateway_service(config, policy, args.template_dir.clone(), go);

    let spinner = output.spinner(&format!(
        "Generating gateway {}/{}",
        placeholders.service_namespace(),
        placeholders.service_name()
    ));
    let result = service.create(&placeholders);
    spinner.finish_and_clear();
    let report = result?;
    info!(services = report.services.len(), "Gateway created");

    if output.is_json() {
        output.json(&report)?;
        return Ok(());
    }
    print_report(output, &placeholders, &report)?;
    Ok(())
}

/// Merge config and flags into the pipeline policy.
fn policy_for(args: &CreateArgs, config: &AppConfig) -> PipelinePolicy {
    let mut policy = base_policy(&args.workspace, config);
    if let Some(endpoint) = args.endpoint {
        policy.endpoint = endpoint.into();
    }
    if args.legacy_anchors {
        policy.anchors = AnchorStyle::Legacy;
    }
    if args.no_overwrite {
        policy.overwrite = false;
    }
    if args.no_workspace {
        policy.register_workspace = false;
    }
    policy
}

fn dry_run(
    args: &CreateArgs,
    output: &OutputManager,
    config: &AppConfig,
    policy: PipelinePolicy,
    placeholders: &PlaceholderSet,
    target: PathBuf,
    exists: bool,
) -> CliResult<()> {
    if exists && !policy.overwrite {
        output.warning(&format!(
            "{} already exists and --no-overwrite is set",
            target.display()
        ))?;
    }

    let service = gateway_service(config, policy, args.template_dir.clone(), unused_go(config));
    let services = service.discover(placeholders)?;
    let depth = placeholders.service_depth();
    let plan = CreatePlan {
        target,
        exists,
        services: &services,
        replaces: services
            .iter()
            .map(|s| Replacement {
                module: &s.module,
                path: s.local_replacement(depth, placeholders.services_directory()),
            })
            .collect(),
        workflow: service.layout().workflow_file(
            placeholders.service_namespace(),
            placeholders.service_name(),
        ),
    };

    if output.is_json() {
        output.json(&plan)?;
        return Ok(());
    }

    output.header("Dry run: no files will be written")?;
    output.print("")?;
    output.print(&format!(
        "  Gateway:   {}/{}",
        placeholders.service_namespace(),
        placeholders.service_name()
    ))?;
    output.print(&format!("  Module:    {}", placeholders.service_fqn()))?;
    output.print(&format!(
        "  Target:    {}{}",
        plan.target.display(),
        if plan.exists { " (replaced)" } else { "" }
    ))?;
    output.print(&format!("  Workflow:  {}", plan.workflow))?;
    output.print("")?;

    if plan.services.is_empty() {
        output.warning("No exposed services found; the gateway would have no handlers")?;
        return Ok(());
    }
    output.print(&format!("  Services ({}):", plan.services.len()))?;
    for replacement in &plan.replaces {
        output.print(&format!("    {} => {}", replacement.module, replacement.path))?;
    }
    Ok(())
}

fn print_report(
    output: &OutputManager,
    placeholders: &PlaceholderSet,
    report: &CreateReport,
) -> CliResult<()> {
    let verb = if report.replaced { "Regenerated" } else { "Created" };
    output.success(&format!(
        "{verb} gateway '{}' at {}",
        placeholders.service_name(),
        report.target.display()
    ))?;

    if report.services.is_empty() {
        output.warning("No exposed services found; the gateway has no handlers")?;
    } else {
        output.print("")?;
        output.print(&format!("  Wired services ({}):", report.services.len()))?;
        for service in &report.services {
            output.print(&format!("    {}  {}", service.qualified_name(), service.module))?;
        }
    }

    output.print("")?;
    output.print(&format!("  Workflow: {}", report.workflow.display()))?;
    if !report.workspace_registered {
        output.info("Skipped go.work registration")?;
    }

    output.print("")?;
    output.header("Next steps:")?;
    output.print(&format!("  cd {}", report.target.display()))?;
    output.print("  go build ./...")?;
    Ok(())
}

/// Ask before replacing an existing gateway; non-interactive sessions proceed.
fn confirm_replace(target: &Path) -> CliResult<()> {
    if !std::io::stdin().is_terminal() {
        debug!("stdin is not a terminal; replacing without confirmation");
        return Ok(());
    }
    prompt_replace(target)
}

#[cfg(feature = "interactive")]
fn prompt_replace(target: &Path) -> CliResult<()> {
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(format!(
            "{} already exists. Replace it?",
            target.display()
        ))
        .default(false)
        .interact()
        .map_err(|e| CliError::IoError {
            message: format!("confirmation prompt failed: {e}"),
            source: std::io::Error::other(e.to_string()),
        })?;
    if confirmed {
        Ok(())
    } else {
        Err(CliError::Cancelled)
    }
}

#[cfg(not(feature = "interactive"))]
fn prompt_replace(_target: &Path) -> CliResult<()> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}
