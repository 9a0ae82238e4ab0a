//! Template Materializer - renders a template subtree into a directory.
//!
//! 1. Load the raw tree from a `TemplateSource`
//! 2. Render paths and contents
//! 3. Write to the filesystem, rolling back on failure

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::application::{
    ApplicationError,
    ports::{Filesystem, TemplateRenderer, TemplateSource},
};
use crate::domain::{DomainValidator as validator, ProjectStructure, RenderContext};
use crate::error::PorticoResult;

pub struct TemplateMaterializer<'a> {
    templates: &'a dyn TemplateSource,
    renderer: &'a dyn TemplateRenderer,
    filesystem: &'a dyn Filesystem,
}

impl<'a> TemplateMaterializer<'a> {
    pub fn new(
        templates: &'a dyn TemplateSource,
        renderer: &'a dyn TemplateRenderer,
        filesystem: &'a dyn Filesystem,
    ) -> Self {
        Self {
            templates,
            renderer,
            filesystem,
        }
    }

    /// Materialize template `subdir` into `target_dir`.
    ///
    /// With `fail_if_exists`, an existing target yields `AlreadyExists` before
    /// anything is loaded or written. Otherwise files are written over the
    /// existing tree.
    #[instrument(skip_all, fields(subdir = %subdir, target = %target_dir.display()))]
    pub fn generate(
        &self,
        subdir: &str,
        target_dir: &Path,
        context: &RenderContext,
        fail_if_exists: bool,
    ) -> PorticoResult<ProjectStructure> {
        let existed = self.filesystem.exists(target_dir);
        if fail_if_exists && existed {
            return Err(ApplicationError::AlreadyExists {
                path: target_dir.to_path_buf(),
            }
            .into());
        }

        let tree = self.templates.load(subdir)?;
        validator::validate_template(&tree, subdir)?;

        let structure = self.renderer.render(&tree, context, target_dir)?;
        validator::validate_project_structure(&structure)?;

        match self.write_all(&structure) {
            Ok(()) => {
                info!(files = structure.file_count(), "Template materialized");
                Ok(structure)
            }
            Err(e) => {
                // Only remove what this call created.
                if !existed {
                    warn!("Write failed, attempting rollback");
                    self.rollback(target_dir);
                }
                Err(e)
            }
        }
    }

    fn write_all(&self, structure: &ProjectStructure) -> PorticoResult<()> {
        self.filesystem.create_dir_all(structure.root())?;

        for file in structure.files() {
            let path = structure.root().join(&file.path);
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&path, &file.content)?;
        }

        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if !self.filesystem.exists(root) {
            return;
        }
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{FakeFs, PlainRenderer, StaticTemplates};
    use crate::domain::{DomainError, TemplateFile, TemplateTree};
    use crate::error::PorticoError;

    fn templates() -> StaticTemplates {
        StaticTemplates::default().with(
            "go",
            TemplateTree::new()
                .with_file(TemplateFile::new("main.go", "package main // {{SERVICE_NAME}}"))
                .with_file(TemplateFile::new("cmd/{{SERVICE_NAME}}/doc.go", "package main")),
        )
    }

    fn ctx() -> RenderContext {
        RenderContext::new().with_variable("SERVICE_NAME", "api")
    }

    #[test]
    fn renders_paths_and_contents() {
        let fs = FakeFs::new();
        let templates = templates();
        let materializer = TemplateMaterializer::new(&templates, &PlainRenderer, &fs);

        let structure = materializer
            .generate("go", Path::new("/p/gw/api"), &ctx(), true)
            .unwrap();

        assert_eq!(structure.file_count(), 2);
        assert_eq!(fs.read("/p/gw/api/main.go").unwrap(), "package main // api");
        assert!(fs.exists(Path::new("/p/gw/api/cmd/api/doc.go")));
    }

    #[test]
    fn existing_target_fails_before_writing() {
        let fs = FakeFs::new().with_file("/p/gw/api/keep.txt", "mine");
        let templates = templates();
        let materializer = TemplateMaterializer::new(&templates, &PlainRenderer, &fs);

        let err = materializer
            .generate("go", Path::new("/p/gw/api"), &ctx(), true)
            .unwrap_err();

        assert!(matches!(
            err,
            PorticoError::Application(ApplicationError::AlreadyExists { .. })
        ));
        assert!(!fs.exists(Path::new("/p/gw/api/main.go")));
    }

    #[test]
    fn existing_target_is_overwritten_when_allowed() {
        let fs = FakeFs::new().with_file("/p/gw/api/main.go", "old");
        let templates = templates();
        let materializer = TemplateMaterializer::new(&templates, &PlainRenderer, &fs);

        materializer
            .generate("go", Path::new("/p/gw/api"), &ctx(), false)
            .unwrap();
        assert_eq!(fs.read("/p/gw/api/main.go").unwrap(), "package main // api");
    }

    #[test]
    fn unknown_subdir_is_an_empty_template() {
        let fs = FakeFs::new();
        let templates = templates();
        let materializer = TemplateMaterializer::new(&templates, &PlainRenderer, &fs);

        let err = materializer
            .generate("rust", Path::new("/p/gw/api"), &ctx(), true)
            .unwrap_err();
        assert!(matches!(
            err,
            PorticoError::Domain(DomainError::EmptyTemplate { .. })
        ));
    }

    #[test]
    fn write_failure_rolls_back_new_target() {
        let fs = FakeFs::new();
        fs.fail_writes_containing("main.go");
        let templates = templates();
        let materializer = TemplateMaterializer::new(&templates, &PlainRenderer, &fs);

        assert!(materializer
            .generate("go", Path::new("/p/gw/api"), &ctx(), true)
            .is_err());
        assert!(!fs.exists(Path::new("/p/gw/api")));
    }
}
