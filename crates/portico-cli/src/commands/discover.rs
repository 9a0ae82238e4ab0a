//! `portico discover` command handler.

use portico_core::domain::ServiceInfo;
use tracing::{info, instrument};

use crate::{
    cli::{DiscoverArgs, ListFormat},
    commands::{base_policy, gateway_service, services_dir, unused_go},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    placeholders::discovery_placeholders,
};

/// Execute the discover command.
#[instrument(skip_all)]
pub fn execute(args: DiscoverArgs, output: &OutputManager, config: &AppConfig) -> CliResult<()> {
    let placeholders =
        discovery_placeholders(&args.workspace.root, services_dir(&args.workspace, config))?;
    let policy = base_policy(&args.workspace, config);
    let service = gateway_service(config, policy, None, unused_go(config));

    let services = service.discover(&placeholders)?;
    info!(count = services.len(), "Discovery finished");

    if output.is_json() || args.format == ListFormat::Json {
        output.json(&services)?;
        return Ok(());
    }

    if services.is_empty() {
        output.warning(&format!(
            "No exposed services under {}",
            args.workspace
                .root
                .join(placeholders.services_directory())
                .display()
        ))?;
        return Ok(());
    }

    match args.format {
        ListFormat::List => {
            for service in &services {
                output.print(&service.module)?;
            }
        }
        ListFormat::Table | ListFormat::Json => print_table(output, &services)?,
    }
    Ok(())
}

fn print_table(output: &OutputManager, services: &[ServiceInfo]) -> CliResult<()> {
    let ns_width = column_width("NAMESPACE", services.iter().map(|s| s.namespace.as_str()));
    let name_width = column_width("SERVICE", services.iter().map(|s| s.service_name.as_str()));

    output.header(&format!(
        "{:<ns_width$}  {:<name_width$}  MODULE",
        "NAMESPACE", "SERVICE"
    ))?;
    for service in services {
        output.print(&format!(
            "{:<ns_width$}  {:<name_width$}  {}",
            service.namespace, service.service_name, service.module
        ))?;
    }
    output.print("")?;
    output.print(&format!("{} exposed service(s)", services.len()))?;
    Ok(())
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values.map(str::len).fold(header.len(), usize::max)
}
