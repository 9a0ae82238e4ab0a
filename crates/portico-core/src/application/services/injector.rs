//! Code Injector - per-service imports, registrations and config fields.

use std::path::Path;

use tracing::{info, instrument};

use crate::application::{ApplicationError, ports::Filesystem};
use crate::domain::{
    GatewayLayout, InsertionPoint, LineDocument, PipelinePolicy, ServiceInfo, snippets,
};
use crate::error::PorticoResult;

pub struct CodeInjector<'a> {
    filesystem: &'a dyn Filesystem,
    layout: &'a GatewayLayout,
    policy: &'a PipelinePolicy,
}

impl<'a> CodeInjector<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        layout: &'a GatewayLayout,
        policy: &'a PipelinePolicy,
    ) -> Self {
        Self {
            filesystem,
            layout,
            policy,
        }
    }

    /// Insert one import, one registration block and (for per-service
    /// config) one config field per exposed service, in discovery order.
    ///
    /// Every document is edited in memory first; nothing is written unless
    /// all insertion points resolved.
    #[instrument(skip_all, fields(target = %target_dir.display(), services = services.len()))]
    pub fn inject(&self, target_dir: &Path, services: &[ServiceInfo]) -> PorticoResult<()> {
        if services.is_empty() {
            info!("No exposed services, handlers left untouched");
            return Ok(());
        }

        let anchors = self.policy.anchors;
        let strategy = self.policy.endpoint;
        let mut edits = Vec::with_capacity(2);

        let mut handlers = self.load(target_dir, &self.layout.handlers_file)?;

        let imports = std::iter::once(String::new()).chain(
            services
                .iter()
                .map(|s| snippets::import_line(s, &self.layout.proto_dir)),
        );
        handlers.insert_at_point(InsertionPoint::Imports, anchors, imports)?;

        let registrations = services
            .iter()
            .flat_map(|s| snippets::registration_block(s, strategy))
            .chain(std::iter::once(String::new()));
        handlers.insert_at_point(InsertionPoint::Registrations, anchors, registrations)?;
        edits.push(handlers);

        if strategy.needs_config_fields() {
            let mut config = self.load(target_dir, &self.layout.config_file)?;
            config.insert_at_point(
                InsertionPoint::ConfigFields,
                anchors,
                services.iter().map(snippets::config_field),
            )?;
            edits.push(config);
        }

        for doc in &edits {
            let path = target_dir.join(doc.name());
            self.filesystem
                .write_file(&path, &doc.render())
                .map_err(|e| ApplicationError::Injection {
                    file: path.clone(),
                    reason: e.to_string(),
                })?;
        }

        info!(files = edits.len(), "Service handlers injected");
        Ok(())
    }

    fn load(&self, target_dir: &Path, relative: &str) -> PorticoResult<LineDocument> {
        let path = target_dir.join(relative);
        let text = self
            .filesystem
            .read_to_string(&path)
            .map_err(|e| ApplicationError::Injection {
                file: path.clone(),
                reason: e.to_string(),
            })?;
        Ok(LineDocument::parse(relative, &text))
    }
}
