//! Gateway Service - main application orchestrator.
//!
//! This service coordinates the entire `create` workflow:
//! 1. Discover exposed backend services
//! 2. Materialize, inject and wire the gateway in a staging directory
//! 3. Promote the staged tree over the target
//! 4. Write the CI workflow and register the workspace member
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{
            ExposureProbe, Filesystem, ModuleTool, TemplateRenderer, TemplateSource,
            WorkspaceTool,
        },
        services::{
            CodeInjector, ExposureDetector, GatewayStubProbe, ModuleWirer, TemplateMaterializer,
            WorkflowGenerator,
        },
    },
    domain::{GatewayLayout, PipelinePolicy, PlaceholderSet, ServiceInfo},
    error::{PorticoError, PorticoResult},
};

/// The purpose of each `create` step, attached to every error it raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Prepare,
    Discover,
    Materialize,
    Inject,
    WireModules,
    Promote,
    Workflow,
    Workspace,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Prepare => "preparing the gateway directory",
            Self::Discover => "finding exposed services",
            Self::Materialize => "generating the gateway structure from the template",
            Self::Inject => "generating handler code",
            Self::WireModules => "generating module files",
            Self::Promote => "replacing the previous gateway",
            Self::Workflow => "generating service workflow",
            Self::Workspace => "adding service to workspace",
        })
    }
}

/// Driven adapters the orchestrator needs.
///
/// `probe` defaults to [`GatewayStubProbe`] over `filesystem`.
pub struct GatewayPorts {
    pub filesystem: Box<dyn Filesystem>,
    pub templates: Box<dyn TemplateSource>,
    pub renderer: Box<dyn TemplateRenderer>,
    pub modules: Box<dyn ModuleTool>,
    pub workspace: Box<dyn WorkspaceTool>,
    pub probe: Option<Box<dyn ExposureProbe>>,
}

/// Outcome of a successful `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateReport {
    pub target: PathBuf,
    pub services: Vec<ServiceInfo>,
    pub workflow: PathBuf,
    /// A previous gateway was replaced.
    pub replaced: bool,
    pub workspace_registered: bool,
}

/// Main gateway generation service.
pub struct GatewayService {
    ports: GatewayPorts,
    layout: GatewayLayout,
    policy: PipelinePolicy,
}

impl GatewayService {
    pub fn new(ports: GatewayPorts, layout: GatewayLayout, policy: PipelinePolicy) -> Self {
        Self {
            ports,
            layout,
            policy,
        }
    }

    pub fn layout(&self) -> &GatewayLayout {
        &self.layout
    }

    pub fn policy(&self) -> &PipelinePolicy {
        &self.policy
    }

    /// Exposed services under `<project_root>/<services_directory>`.
    ///
    /// Read-only: a missing services root is an error here.
    pub fn discover(&self, placeholders: &PlaceholderSet) -> PorticoResult<Vec<ServiceInfo>> {
        let root = services_root(placeholders);
        self.detect(&root)
            .map_err(|e| e.in_step(PipelineStep::Discover, &root))
    }

    /// Generate (or regenerate) the gateway described by `placeholders`.
    #[instrument(
        skip_all,
        fields(
            namespace = %placeholders.service_namespace(),
            service = %placeholders.service_name()
        )
    )]
    pub fn create(&self, placeholders: &PlaceholderSet) -> PorticoResult<CreateReport> {
        let fs = self.ports.filesystem.as_ref();
        let target = target_dir(placeholders);
        let services_root = services_root(placeholders);
        let target_ref = &target;
        let at = |step: PipelineStep| move |e: PorticoError| e.in_step(step, target_ref);

        // 1. Existing gateway
        let replaced = fs.exists(&target);
        if replaced && !self.policy.overwrite {
            let err: PorticoError = ApplicationError::AlreadyExists {
                path: target.clone(),
            }
            .into();
            return Err(err.in_step(PipelineStep::Prepare, &target));
        }

        // 2. Discovery
        fs.create_dir_all(&services_root)
            .map_err(at(PipelineStep::Prepare))?;
        let services = self.detect(&services_root).map_err(at(PipelineStep::Discover))?;
        info!(count = services.len(), "Exposed services found");

        // 3. Build in staging, then promote
        let staging = staging_dir(&target);
        match self.build(&staging, placeholders, &services) {
            Ok(()) => {}
            Err((step, e)) => {
                self.discard(&staging);
                return Err(e.in_step(step, &target));
            }
        }

        if let Err(e) = self.promote(&staging, &target, replaced) {
            self.discard(&staging);
            return Err(e.in_step(PipelineStep::Promote, &target));
        }
        info!(target = %target.display(), "Gateway generated");

        // 4. Post-promotion steps
        let workflow = WorkflowGenerator::new(
            self.ports.templates.as_ref(),
            self.ports.renderer.as_ref(),
            fs,
            &self.layout,
        )
        .generate(placeholders)
        .map_err(at(PipelineStep::Workflow))?;

        if self.policy.register_workspace {
            self.ports
                .workspace
                .use_member(
                    Path::new(placeholders.project_root()),
                    Path::new(placeholders.service_directory()),
                )
                .map_err(at(PipelineStep::Workspace))?;
        }

        Ok(CreateReport {
            target,
            services,
            workflow,
            replaced,
            workspace_registered: self.policy.register_workspace,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn detect(&self, services_root: &Path) -> PorticoResult<Vec<ServiceInfo>> {
        let fs = self.ports.filesystem.as_ref();
        let default_probe;
        let probe: &dyn ExposureProbe = match &self.ports.probe {
            Some(probe) => probe.as_ref(),
            None => {
                default_probe = GatewayStubProbe::new(fs, &self.layout);
                &default_probe
            }
        };
        ExposureDetector::new(fs, probe, &self.policy).discover(services_root)
    }

    /// Materialize, inject and wire inside `staging`.
    fn build(
        &self,
        staging: &Path,
        placeholders: &PlaceholderSet,
        services: &[ServiceInfo],
    ) -> Result<(), (PipelineStep, PorticoError)> {
        let fs = self.ports.filesystem.as_ref();

        TemplateMaterializer::new(
            self.ports.templates.as_ref(),
            self.ports.renderer.as_ref(),
            fs,
        )
        .generate(
            &self.layout.template_subdir,
            staging,
            &placeholders.render_context(),
            true,
        )
        .map_err(|e| (PipelineStep::Materialize, e))?;

        CodeInjector::new(fs, &self.layout, &self.policy)
            .inject(staging, services)
            .map_err(|e| (PipelineStep::Inject, e))?;

        ModuleWirer::new(self.ports.modules.as_ref())
            .wire(staging, placeholders, services)
            .map_err(|e| (PipelineStep::WireModules, e))?;

        Ok(())
    }

    /// Swap `staging` into `target`.
    ///
    /// A previous gateway is moved to a hidden backup first and restored if
    /// the swap fails, so it is only removed once the new tree is in place.
    fn promote(&self, staging: &Path, target: &Path, replaced: bool) -> PorticoResult<()> {
        let fs = self.ports.filesystem.as_ref();
        if !replaced {
            return fs.rename(staging, target);
        }

        let backup = hidden_sibling(target, "backup");
        fs.rename(target, &backup)?;

        if let Err(e) = fs.rename(staging, target) {
            if let Err(restore) = fs.rename(&backup, target) {
                let err: PorticoError = ApplicationError::RollbackFailed {
                    path: backup.clone(),
                    reason: format!("{restore} (after: {e})"),
                }
                .into();
                return Err(err);
            }
            return Err(e);
        }

        if let Err(e) = fs.remove_dir_all(&backup) {
            warn!(
                error = %e,
                path = %backup.display(),
                "Could not remove previous gateway backup"
            );
        }
        Ok(())
    }

    /// Best-effort removal of a staging directory.
    fn discard(&self, staging: &Path) {
        let fs = self.ports.filesystem.as_ref();
        if !fs.exists(staging) {
            return;
        }
        if let Err(e) = fs.remove_dir_all(staging) {
            warn!(
                error = %e,
                path = %staging.display(),
                "Could not remove staging directory"
            );
        }
    }
}

fn target_dir(placeholders: &PlaceholderSet) -> PathBuf {
    Path::new(placeholders.project_root()).join(placeholders.service_directory())
}

fn services_root(placeholders: &PlaceholderSet) -> PathBuf {
    Path::new(placeholders.project_root()).join(placeholders.services_directory())
}

/// Hidden sibling of `target`, at the same depth so relative replace paths
/// written into the staged manifest stay valid after promotion.
fn staging_dir(target: &Path) -> PathBuf {
    hidden_sibling(target, "staging")
}

/// `.<name>.<kind>-<uuid>` next to `target`.
fn hidden_sibling(target: &Path, kind: &str) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "gateway".to_string());
    let hidden = format!(".{name}.{kind}-{}", Uuid::new_v4().simple());
    match target.parent() {
        Some(parent) => parent.join(hidden),
        None => PathBuf::from(hidden),
    }
}
