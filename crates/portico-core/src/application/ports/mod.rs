//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `portico-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateSource`: Raw template trees
//!   - `TemplateRenderer`: Placeholder substitution
//!   - `ModuleTool` / `WorkspaceTool`: Go toolchain
//!   - `ExposureProbe`: Backend capability check
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    DirEntry, ExposureProbe, Filesystem, ModuleTool, TemplateRenderer, TemplateSource,
    WorkspaceTool,
};

#[cfg(test)]
pub use output::{MockExposureProbe, MockModuleTool, MockWorkspaceTool};
