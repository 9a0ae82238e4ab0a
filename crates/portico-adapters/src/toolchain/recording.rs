//! Toolchain double that records invocations instead of spawning `go`.
//!
//! With a filesystem attached it also applies the file effects the real
//! commands have (`go.mod` creation, `replace` directives, `go.work`
//! membership), so pipelines can be checked end to end without Go installed.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use portico_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, ModuleTool, WorkspaceTool},
    },
    domain::ModuleManifest,
    error::{PorticoError, PorticoResult},
};

const GO_VERSION: &str = "1.22";

/// One recorded tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
}

impl ToolInvocation {
    /// `program arg1 arg2 ...`
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Recording `ModuleTool` + `WorkspaceTool`.
///
/// Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingToolchain {
    log: Arc<Mutex<Vec<ToolInvocation>>>,
    filesystem: Option<Arc<dyn Filesystem>>,
    failures: Arc<Mutex<Vec<String>>>,
}

impl std::fmt::Debug for RecordingToolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingToolchain")
            .field("invocations", &self.invocations().len())
            .field("with_filesystem", &self.filesystem.is_some())
            .finish()
    }
}

impl RecordingToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply file effects through `fs`.
    pub fn with_filesystem(mut self, fs: Arc<dyn Filesystem>) -> Self {
        self.filesystem = Some(fs);
        self
    }

    /// Fail every command whose command line starts with `prefix`
    /// (e.g. `"go mod tidy"`).
    pub fn fail_on(self, prefix: &str) -> Self {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(prefix.to_string());
        }
        self
    }

    /// Everything recorded so far, in call order.
    pub fn invocations(&self) -> Vec<ToolInvocation> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Recorded command lines, in call order.
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations()
            .iter()
            .map(ToolInvocation::command_line)
            .collect()
    }

    fn record(&self, dir: &Path, args: &[&str]) -> Option<String> {
        let invocation = ToolInvocation {
            program: "go".into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            dir: dir.to_path_buf(),
        };
        let line = invocation.command_line();
        debug!(dir = %dir.display(), command = %line, "Recorded");

        if let Ok(mut log) = self.log.lock() {
            log.push(invocation);
        }

        let failing = self
            .failures
            .lock()
            .map(|f| f.iter().any(|p| line.starts_with(p.as_str())))
            .unwrap_or(false);
        failing.then_some(line)
    }
}

fn injected(dir: &Path, command: String, workspace: bool) -> PorticoError {
    let dir = dir.to_path_buf();
    let output = "injected failure".to_string();
    if workspace {
        ApplicationError::Workspace {
            command,
            dir,
            output,
        }
        .into()
    } else {
        ApplicationError::Module {
            command,
            dir,
            output,
        }
        .into()
    }
}

impl ModuleTool for RecordingToolchain {
    fn init(&self, dir: &Path, module: &str) -> PorticoResult<()> {
        if let Some(command) = self.record(dir, &["mod", "init", module]) {
            return Err(injected(dir, command, false));
        }
        if let Some(fs) = &self.filesystem {
            let manifest = ModuleManifest::new(module, GO_VERSION);
            fs.write_file(&dir.join("go.mod"), &manifest.render())?;
        }
        Ok(())
    }

    fn replace(&self, dir: &Path, module: &str, path: &str) -> PorticoResult<()> {
        let directive = format!("{module}={path}");
        if let Some(command) = self.record(dir, &["mod", "edit", "-replace", &directive]) {
            return Err(injected(dir, command, false));
        }
        if let Some(fs) = &self.filesystem {
            let file = dir.join("go.mod");
            let text = fs.read_to_string(&file)?;
            let mut manifest = ModuleManifest::parse(&file.to_string_lossy(), &text)?;
            manifest.set_replace(module, path);
            fs.write_file(&file, &manifest.render())?;
        }
        Ok(())
    }

    fn tidy(&self, dir: &Path) -> PorticoResult<()> {
        match self.record(dir, &["mod", "tidy"]) {
            Some(command) => Err(injected(dir, command, false)),
            None => Ok(()),
        }
    }
}

impl WorkspaceTool for RecordingToolchain {
    fn use_member(&self, workspace_root: &Path, member: &Path) -> PorticoResult<()> {
        let member = member.to_string_lossy().replace('\\', "/");
        if let Some(command) = self.record(workspace_root, &["work", "use", &member]) {
            return Err(injected(workspace_root, command, true));
        }

        let Some(fs) = &self.filesystem else {
            return Ok(());
        };
        let file = workspace_root.join("go.work");
        let entry = format!("use ./{}", member.trim_start_matches("./"));

        let mut text = if fs.exists(&file) {
            fs.read_to_string(&file)?
        } else {
            format!("go {GO_VERSION}\n")
        };
        if text.lines().any(|l| l.trim() == entry) {
            return Ok(());
        }
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&entry);
        text.push('\n');
        fs.write_file(&file, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryFilesystem;

    fn toolchain() -> (RecordingToolchain, MemoryFilesystem) {
        let fs = MemoryFilesystem::new().with_dir("/ws/gw/api");
        let tools = RecordingToolchain::new().with_filesystem(Arc::new(fs.clone()));
        (tools, fs)
    }

    #[test]
    fn records_calls_in_order() {
        let tools = RecordingToolchain::new();
        let dir = Path::new("/gw");

        tools.init(dir, "example.com/gw").unwrap();
        tools.replace(dir, "example.com/a", "../a").unwrap();
        tools.tidy(dir).unwrap();

        assert_eq!(
            tools.command_lines(),
            vec![
                "go mod init example.com/gw",
                "go mod edit -replace example.com/a=../a",
                "go mod tidy",
            ]
        );
        assert!(tools.invocations().iter().all(|i| i.dir == dir));
    }

    #[test]
    fn init_and_replace_edit_go_mod() {
        let (tools, fs) = toolchain();
        let dir = Path::new("/ws/gw/api");

        tools.init(dir, "example.com/gw/api").unwrap();
        tools
            .replace(dir, "example.com/billing/invoices", "../../billing/invoices")
            .unwrap();

        let text = fs.read_file("/ws/gw/api/go.mod").unwrap();
        let manifest = ModuleManifest::parse("go.mod", &text).unwrap();
        assert_eq!(manifest.module_name(), "example.com/gw/api");
        assert_eq!(
            manifest.replaces().get("example.com/billing/invoices").map(String::as_str),
            Some("../../billing/invoices")
        );
    }

    #[test]
    fn use_member_creates_and_extends_go_work() {
        let (tools, fs) = toolchain();
        let root = Path::new("/ws");

        tools.use_member(root, Path::new("gw/api")).unwrap();
        tools.use_member(root, Path::new("gw/api")).unwrap();
        tools.use_member(root, Path::new("billing/invoices")).unwrap();

        assert_eq!(
            fs.read_file("/ws/go.work").unwrap(),
            "go 1.22\nuse ./gw/api\nuse ./billing/invoices\n"
        );
    }

    #[test]
    fn injected_failures_are_reported_and_recorded() {
        let tools = RecordingToolchain::new().fail_on("go mod tidy");

        let err = tools.tidy(Path::new("/gw")).unwrap_err();
        assert!(matches!(
            err,
            PorticoError::Application(ApplicationError::Module { .. })
        ));
        assert_eq!(tools.command_lines(), vec!["go mod tidy"]);

        let ws = RecordingToolchain::new().fail_on("go work");
        assert!(matches!(
            ws.use_member(Path::new("/"), Path::new("gw")).unwrap_err(),
            PorticoError::Application(ApplicationError::Workspace { .. })
        ));
    }
}
