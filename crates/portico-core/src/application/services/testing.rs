//! In-crate test doubles for the driven ports.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::{
    ApplicationError,
    ports::{DirEntry, Filesystem, TemplateRenderer, TemplateSource},
};
use crate::domain::{ProjectStructure, RenderContext, TemplateTree};
use crate::error::PorticoResult;

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(String),
}

/// Map-backed filesystem. Directories are explicit entries.
///
/// Clones share state, so a test can keep a handle after boxing one.
#[derive(Default, Clone)]
pub struct FakeFs {
    nodes: Arc<Mutex<BTreeMap<PathBuf, Node>>>,
    fail_writes_containing: Arc<Mutex<Option<String>>>,
    fail_next_rename_to: Arc<Mutex<Option<PathBuf>>>,
}

impl FakeFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        self.write_file(path.as_ref(), content).unwrap();
        self
    }

    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.create_dir_all(path.as_ref()).unwrap();
        self
    }

    /// Make every write whose path contains `needle` fail.
    pub fn fail_writes_containing(&self, needle: &str) {
        *self.fail_writes_containing.lock().unwrap() = Some(needle.to_string());
    }

    /// Make the next rename onto `to` fail once.
    pub fn fail_next_rename_to(&self, to: impl AsRef<Path>) {
        *self.fail_next_rename_to.lock().unwrap() = Some(to.as_ref().to_path_buf());
    }

    pub fn read(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.nodes.lock().unwrap().get(path.as_ref()) {
            Some(Node::File(c)) => Some(c.clone()),
            _ => None,
        }
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.nodes.lock().unwrap().keys().cloned().collect()
    }

    fn error(path: &Path, reason: &str) -> crate::error::PorticoError {
        ApplicationError::Filesystem {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
        .into()
    }
}

impl Filesystem for FakeFs {
    fn create_dir_all(&self, path: &Path) -> PorticoResult<()> {
        let mut nodes = self.nodes.lock().unwrap();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> PorticoResult<()> {
        if let Some(needle) = self.fail_writes_containing.lock().unwrap().as_deref() {
            if path.to_string_lossy().contains(needle) {
                return Err(Self::error(path, "injected write failure"));
            }
        }
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        self.nodes
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), Node::File(content.to_string()));
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> PorticoResult<String> {
        self.read(path).ok_or_else(|| Self::error(path, "not found"))
    }

    fn list_dir(&self, path: &Path) -> PorticoResult<Vec<DirEntry>> {
        let nodes = self.nodes.lock().unwrap();
        if !matches!(nodes.get(path), Some(Node::Dir)) {
            return Err(Self::error(path, "not a directory"));
        }
        Ok(nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(p, node)| DirEntry {
                name: p.file_name().unwrap().to_string_lossy().into_owned(),
                is_dir: matches!(node, Node::Dir),
            })
            .collect())
    }

    fn exists(&self, path: &Path) -> bool {
        self.nodes.lock().unwrap().contains_key(path)
    }

    fn remove_dir_all(&self, path: &Path) -> PorticoResult<()> {
        let mut nodes = self.nodes.lock().unwrap();
        if !nodes.contains_key(path) {
            return Err(Self::error(path, "not found"));
        }
        nodes.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> PorticoResult<()> {
        {
            let mut failing = self.fail_next_rename_to.lock().unwrap();
            if failing.as_deref() == Some(to) {
                *failing = None;
                return Err(Self::error(to, "injected rename failure"));
            }
        }
        let mut nodes = self.nodes.lock().unwrap();
        if nodes.contains_key(to) {
            return Err(Self::error(to, "destination exists"));
        }
        let moved: Vec<_> = nodes
            .keys()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        if moved.is_empty() {
            return Err(Self::error(from, "not found"));
        }
        for old in moved {
            let node = nodes.remove(&old).unwrap();
            let new = to.join(old.strip_prefix(from).unwrap());
            nodes.insert(new, node);
        }
        Ok(())
    }
}

/// Template source serving fixed trees by subdir.
#[derive(Default)]
pub struct StaticTemplates {
    trees: BTreeMap<String, TemplateTree>,
}

impl StaticTemplates {
    pub fn with(mut self, subdir: &str, tree: TemplateTree) -> Self {
        self.trees.insert(subdir.to_string(), tree);
        self
    }
}

impl TemplateSource for StaticTemplates {
    fn load(&self, subdir: &str) -> PorticoResult<TemplateTree> {
        Ok(self.trees.get(subdir).cloned().unwrap_or_default())
    }
}

/// Renders paths and contents through `RenderContext::render`.
pub struct PlainRenderer;

impl TemplateRenderer for PlainRenderer {
    fn render(
        &self,
        tree: &TemplateTree,
        context: &RenderContext,
        output_root: &Path,
    ) -> PorticoResult<ProjectStructure> {
        let mut structure = ProjectStructure::new(output_root);
        for file in tree.files() {
            structure.add_file(
                context.render(&file.path.to_slash_string()),
                context.render(&file.content),
            );
        }
        Ok(structure)
    }
}

pub const HANDLERS_GO: &str = "package handlers

import (
\t\"context\"
\t\"fmt\"

\t\"github.com/grpc-ecosystem/grpc-gateway/v2/runtime\"
\t\"google.golang.org/grpc\"
\t// portico:extension-point imports/v1
)

func Register(ctx context.Context, mux *runtime.ServeMux, conf config.Config, opts []grpc.DialOption) error {
\t// portico:extension-point registrations/v1
\treturn nil
}
";

pub const CONFIG_GO: &str = "package config

type Config struct {
\t// portico:extension-point config-fields/v1
\tGrpcPort string `env:\"GRPC_PORT\" envDefault:\"9090\"`
}
";
