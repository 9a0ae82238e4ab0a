//! `go mod` / `go work` through `std::process::Command`.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::{debug, info, instrument};

use portico_core::{
    application::{
        ApplicationError,
        ports::{ModuleTool, WorkspaceTool},
    },
    error::{PorticoError, PorticoResult},
};

#[derive(Debug, Error)]
enum CommandFailure {
    #[error("could not start {program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("exited with {status}: {output}")]
    Exit { status: ExitStatus, output: String },
}

#[derive(Debug, Clone, Copy)]
enum ToolKind {
    Module,
    Workspace,
}

/// Runs the real `go` binary.
///
/// Commands run synchronously with no timeout; a non-zero exit is reported
/// with the combined stdout and stderr of the command.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    binary: PathBuf,
}

impl GoToolchain {
    /// Find `go` on `PATH`.
    pub fn locate() -> PorticoResult<Self> {
        let binary = which::which("go").map_err(|_| ApplicationError::ToolNotFound {
            tool: "go".into(),
        })?;
        debug!(binary = %binary.display(), "Located go toolchain");
        Ok(Self { binary })
    }

    /// Use an explicit binary (e.g. from configuration).
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn run(&self, kind: ToolKind, dir: &Path, args: &[&str]) -> PorticoResult<()> {
        let command = format!("go {}", args.join(" "));
        debug!(dir = %dir.display(), command = %command, "Running");

        self.execute(dir, args).map_err(|failure| {
            let output = failure.to_string();
            let dir = dir.to_path_buf();
            let err = match kind {
                ToolKind::Module => ApplicationError::Module {
                    command,
                    dir,
                    output,
                },
                ToolKind::Workspace => ApplicationError::Workspace {
                    command,
                    dir,
                    output,
                },
            };
            PorticoError::from(err)
        })
    }

    fn execute(&self, dir: &Path, args: &[&str]) -> Result<(), CommandFailure> {
        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|source| CommandFailure::Spawn {
                program: self.binary.display().to_string(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(CommandFailure::Exit {
            status: output.status,
            output: combined.trim().to_string(),
        })
    }
}

impl ModuleTool for GoToolchain {
    #[instrument(skip(self), fields(dir = %dir.display()))]
    fn init(&self, dir: &Path, module: &str) -> PorticoResult<()> {
        self.run(ToolKind::Module, dir, &["mod", "init", module])
    }

    fn replace(&self, dir: &Path, module: &str, path: &str) -> PorticoResult<()> {
        let directive = format!("{module}={path}");
        self.run(ToolKind::Module, dir, &["mod", "edit", "-replace", &directive])
    }

    #[instrument(skip(self), fields(dir = %dir.display()))]
    fn tidy(&self, dir: &Path) -> PorticoResult<()> {
        self.run(ToolKind::Module, dir, &["mod", "tidy"])
    }
}

impl WorkspaceTool for GoToolchain {
    #[instrument(skip(self), fields(root = %workspace_root.display()))]
    fn use_member(&self, workspace_root: &Path, member: &Path) -> PorticoResult<()> {
        if !workspace_root.join("go.work").exists() {
            info!("No go.work found, initializing workspace");
            self.run(ToolKind::Workspace, workspace_root, &["work", "init"])?;
        }
        let member = member.to_string_lossy();
        self.run(ToolKind::Workspace, workspace_root, &["work", "use", &member])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_binary_is_a_module_error() {
        let temp = TempDir::new().unwrap();
        let go = GoToolchain::with_binary(temp.path().join("no-such-go"));

        let err = go.tidy(temp.path()).unwrap_err();
        match err {
            PorticoError::Application(ApplicationError::Module { command, output, .. }) => {
                assert_eq!(command, "go mod tidy");
                assert!(output.contains("could not start"), "{output}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_reports_output() {
        let temp = TempDir::new().unwrap();
        let go = GoToolchain::with_binary("false");

        let err = go.use_member(temp.path(), Path::new("services/gw/api")).unwrap_err();
        assert!(matches!(
            err,
            PorticoError::Application(ApplicationError::Workspace { .. })
        ));
    }
}
