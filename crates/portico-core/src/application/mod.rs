//! Application layer for Portico.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GatewayService and its components)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CodeInjector, CreateReport, ExposureDetector, GatewayPorts, GatewayService,
    GatewayStubProbe, ModuleWirer, PipelineStep, TemplateMaterializer, WorkflowGenerator,
    walker,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    DirEntry, ExposureProbe, Filesystem, ModuleTool, TemplateRenderer, TemplateSource,
    WorkspaceTool,
};

pub use error::ApplicationError;
