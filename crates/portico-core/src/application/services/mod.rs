//! Application services - orchestrate use cases.
//!
//! Each pipeline component is a small service borrowing the ports it needs;
//! `GatewayService` owns the ports and sequences the components.

pub mod discovery;
pub mod gateway_service;
pub mod injector;
pub mod materializer;
pub mod walker;
pub mod wirer;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use discovery::{ExposureDetector, GatewayStubProbe};
pub use gateway_service::{CreateReport, GatewayPorts, GatewayService, PipelineStep};
pub use injector::CodeInjector;
pub use materializer::TemplateMaterializer;
pub use wirer::ModuleWirer;
pub use workflow::WorkflowGenerator;
