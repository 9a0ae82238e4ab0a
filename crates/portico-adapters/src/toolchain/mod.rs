//! Go toolchain adapters for the `ModuleTool` and `WorkspaceTool` ports.

mod go;
mod recording;

pub use go::GoToolchain;
pub use recording::{RecordingToolchain, ToolInvocation};
