//! Portico Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Portico
//! gateway scaffolder, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           portico-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  walker → detector → materializer →     │
//! │  injector → wirer → workflow            │
//! │  (sequenced by GatewayService)          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ Filesystem, TemplateSource, Renderer,   │
//! │ ModuleTool, WorkspaceTool, Probe        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     portico-adapters (Infrastructure)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use portico_core::prelude::*;
//!
//! let placeholders = PlaceholderSet::builder()
//!     .service_namespace("gw")
//!     .service_name("api")
//!     .service_fqn("example.com/platform/services/gw/api")
//!     .service_directory("services/gw/api")
//!     .services_directory("services")
//!     .build()?;
//!
//! let service = GatewayService::new(ports, GatewayLayout::default(), PipelinePolicy::default());
//! let report = service.create(&placeholders)?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CodeInjector, CreateReport, ExposureDetector, GatewayPorts, GatewayService,
        ModuleWirer, TemplateMaterializer, WorkflowGenerator,
        ports::{
            DirEntry, ExposureProbe, Filesystem, ModuleTool, TemplateRenderer, TemplateSource,
            WorkspaceTool,
        },
    };
    pub use crate::domain::{
        AnchorStyle, EndpointStrategy, Exposure, GatewayLayout, InsertionPoint, LineDocument,
        ModuleManifest, PipelinePolicy, PlaceholderSet, ProjectStructure, RenderContext,
        ServiceInfo, ServiceLocation, TemplateFile, TemplateTree,
    };
    pub use crate::error::{PorticoError, PorticoResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
