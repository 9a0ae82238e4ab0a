//! Simple variable substitution renderer.

use std::path::{Component, Path, PathBuf};

use portico_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{DomainValidator as validator, ProjectStructure, RenderContext, TemplateTree},
    error::PorticoResult,
};
use tracing::instrument;

/// Simple renderer using `{{KEY}}` substitution in paths and contents.
pub struct SimpleRenderer;

impl SimpleRenderer {
    /// Create a new simple renderer.
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimpleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(files = tree.len()))]
    fn render(
        &self,
        tree: &TemplateTree,
        context: &RenderContext,
        output_root: &Path,
    ) -> PorticoResult<ProjectStructure> {
        let mut structure = ProjectStructure::new(output_root);

        for file in tree.files() {
            let path = render_path(&file.path.to_slash_string(), context)?;
            structure.add_file(path, context.render(&file.content));
        }

        validator::validate_project_structure(&structure)?;
        Ok(structure)
    }
}

/// A rendered path must stay relative and must not climb out of the root.
fn render_path(template_path: &str, context: &RenderContext) -> PorticoResult<PathBuf> {
    let rendered = context.render(template_path);
    let path = PathBuf::from(&rendered);

    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if rendered.is_empty() || escapes {
        return Err(ApplicationError::RenderingFailed {
            reason: format!("path '{template_path}' rendered to invalid path '{rendered}'"),
        }
        .into());
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_core::domain::TemplateFile;

    fn ctx() -> RenderContext {
        RenderContext::new()
            .with_variable("SERVICE_NAME", "api")
            .with_variable("SERVICE_FQN", "example.com/services/gw/api")
    }

    #[test]
    fn renders_paths_and_contents() {
        let tree = TemplateTree::new()
            .with_file(TemplateFile::new("cmd/{{SERVICE_NAME}}/doc.go", "// {{SERVICE_FQN}}"))
            .with_file(TemplateFile::new("Dockerfile", "FROM scratch"));

        let structure = SimpleRenderer::new()
            .render(&tree, &ctx(), Path::new("/out"))
            .unwrap();

        let files: Vec<_> = structure
            .files()
            .map(|f| (f.path.clone(), f.content.clone()))
            .collect();
        assert_eq!(
            files,
            vec![
                (PathBuf::from("Dockerfile"), "FROM scratch".to_string()),
                (
                    PathBuf::from("cmd/api/doc.go"),
                    "// example.com/services/gw/api".to_string()
                ),
            ]
        );
        assert_eq!(structure.root(), Path::new("/out"));
    }

    #[test]
    fn rejects_paths_escaping_root() {
        let tree = TemplateTree::new().with_file(TemplateFile::new("{{SERVICE_NAME}}/x", ""));
        let ctx = RenderContext::new().with_variable("SERVICE_NAME", "..");

        assert!(SimpleRenderer.render(&tree, &ctx, Path::new("/out")).is_err());
    }

    #[test]
    fn paths_colliding_after_render_are_rejected() {
        let tree = TemplateTree::new()
            .with_file(TemplateFile::new("{{SERVICE_NAME}}.go", ""))
            .with_file(TemplateFile::new("api.go", ""));

        assert!(SimpleRenderer.render(&tree, &ctx(), Path::new("/out")).is_err());
    }
}
