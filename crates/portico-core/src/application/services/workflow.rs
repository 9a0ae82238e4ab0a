//! CI workflow generation for a gateway.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::application::ports::{Filesystem, TemplateRenderer, TemplateSource};
use crate::domain::{DomainError, DomainValidator as validator, GatewayLayout, PlaceholderSet};
use crate::error::PorticoResult;

pub struct WorkflowGenerator<'a> {
    templates: &'a dyn TemplateSource,
    renderer: &'a dyn TemplateRenderer,
    filesystem: &'a dyn Filesystem,
    layout: &'a GatewayLayout,
}

impl<'a> WorkflowGenerator<'a> {
    pub fn new(
        templates: &'a dyn TemplateSource,
        renderer: &'a dyn TemplateRenderer,
        filesystem: &'a dyn Filesystem,
        layout: &'a GatewayLayout,
    ) -> Self {
        Self {
            templates,
            renderer,
            filesystem,
            layout,
        }
    }

    /// Render the single-file workflow template and write it to
    /// `<project_root>/<workflow_dir>/<namespace>-<name>.yml`, replacing any
    /// existing file. Returns the written path.
    #[instrument(skip_all, fields(service = %placeholders.service_name()))]
    pub fn generate(&self, placeholders: &PlaceholderSet) -> PorticoResult<PathBuf> {
        let subdir = &self.layout.workflow_template_subdir;
        let tree = self.templates.load(subdir)?;
        validator::validate_template(&tree, subdir)?;
        if tree.len() != 1 {
            return Err(DomainError::InvalidTemplate(format!(
                "workflow template '{subdir}' must contain exactly one file, found {}",
                tree.len()
            ))
            .into());
        }

        let root = Path::new(placeholders.project_root());
        let structure = self
            .renderer
            .render(&tree, &placeholders.render_context(), root)?;
        let content = structure
            .files()
            .next()
            .map(|f| f.content.as_str())
            .unwrap_or_default();

        let path = root.join(self.layout.workflow_file(
            placeholders.service_namespace(),
            placeholders.service_name(),
        ));
        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(&path, content)?;

        info!(path = %path.display(), "Workflow written");
        Ok(path)
    }
}
