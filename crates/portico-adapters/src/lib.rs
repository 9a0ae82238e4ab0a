//! Infrastructure adapters for Portico.
//!
//! This crate implements the ports defined in `portico-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod renderer;
pub mod templates;
pub mod toolchain;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::SimpleRenderer;
pub use templates::{DirectoryTemplates, EmbeddedTemplates, InMemoryTemplates};
pub use toolchain::{GoToolchain, RecordingToolchain, ToolInvocation};
