//! Templates compiled into the binary.

use rust_embed::Embed;
use tracing::debug;

use portico_core::{
    application::{ApplicationError, ports::TemplateSource},
    domain::{TemplateFile, TemplateTree},
    error::PorticoResult,
};

#[derive(Embed)]
#[folder = "templates/"]
struct BuiltinAssets;

/// The stock Go gateway and workflow templates shipped with Portico.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplates;

impl EmbeddedTemplates {
    pub fn new() -> Self {
        Self
    }

    /// Top-level template subdirs available in the binary.
    pub fn subdirs() -> Vec<String> {
        let mut out: Vec<String> = <BuiltinAssets as Embed>::iter()
            .filter_map(|p| p.split_once('/').map(|(dir, _)| dir.to_string()))
            .collect();
        out.sort();
        out.dedup();
        out
    }
}

impl TemplateSource for EmbeddedTemplates {
    fn load(&self, subdir: &str) -> PorticoResult<TemplateTree> {
        let prefix = format!("{}/", subdir.trim_matches('/'));
        let mut tree = TemplateTree::new();

        for path in <BuiltinAssets as Embed>::iter() {
            let Some(relative) = path.strip_prefix(&prefix) else {
                continue;
            };
            let Some(asset) = <BuiltinAssets as Embed>::get(&path) else {
                continue;
            };
            let content = String::from_utf8(asset.data.into_owned()).map_err(|_| {
                ApplicationError::RenderingFailed {
                    reason: format!("embedded template {path} is not UTF-8"),
                }
            })?;
            tree.push(TemplateFile::try_new(relative, content)?);
        }

        if tree.is_empty() {
            return Err(ApplicationError::TemplateNotFound {
                subdir: subdir.to_string(),
                source_name: "built-in templates".into(),
            }
            .into());
        }

        debug!(subdir, files = tree.len(), "Loaded built-in template");
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(tree: &TemplateTree) -> Vec<String> {
        tree.files().iter().map(|f| f.path.to_slash_string()).collect()
    }

    #[test]
    fn ships_go_and_workflow_templates() {
        assert_eq!(EmbeddedTemplates::subdirs(), vec!["go", "workflows"]);
    }

    #[test]
    fn go_template_has_injection_targets() {
        let tree = EmbeddedTemplates.load("go").unwrap();
        let paths = paths(&tree);

        assert!(paths.contains(&"handlers/handlers.go".to_string()));
        assert!(paths.contains(&"config/config.go".to_string()));
        assert!(paths.contains(&"cmd/{{SERVICE_NAME}}/doc.go".to_string()));
    }

    #[test]
    fn workflow_template_is_single_file() {
        assert_eq!(EmbeddedTemplates.load("workflows").unwrap().len(), 1);
    }

    #[test]
    fn unknown_subdir_is_not_found() {
        assert!(EmbeddedTemplates.load("rust").is_err());
    }
}
