//! Core domain layer for Portico.
//!
//! Pure logic: no filesystem, no processes. Everything that touches the
//! outside world goes through the ports defined in the application layer.
//!
//! - **entities**: placeholders, backend services, template trees, rendered
//!   structures
//! - **document**: line-oriented source files and their insertion points
//! - **snippets**: Go fragments synthesized per exposed service
//! - **manifest**: the subset of `go.mod` the generator edits
//! - **policy**: layout conventions and pipeline switches
pub mod casing;
pub mod document;
pub mod entities;
pub mod error;
pub mod manifest;
pub mod policy;
pub mod render;
pub mod snippets;

mod validation;

pub use document::{AnchorStyle, InsertionPoint, LineDocument};
pub use entities::{
    Exposure, PlaceholderSet, PlaceholderSetBuilder, ProjectStructure, ServiceInfo,
    ServiceLocation, TemplateFile, TemplateTree,
    common::RelativePath,
    project_structure::FileToWrite,
};
pub use error::{DomainError, ErrorCategory};
pub use manifest::ModuleManifest;
pub use policy::{GatewayLayout, PipelinePolicy};
pub use render::RenderContext;
pub use snippets::EndpointStrategy;
pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Cross-entity behavior
    // ========================================================================

    #[test]
    fn placeholders_render_template_paths() {
        let placeholders = PlaceholderSet::builder()
            .service_namespace("gw")
            .service_name("api")
            .service_fqn("example.com/platform/services/gw/api")
            .service_directory("services/gw/api")
            .services_directory("services")
            .build()
            .unwrap();

        let file = TemplateFile::new("cmd/{{SERVICE_NAME}}/doc.go", "package main");
        let rendered = placeholders
            .render_context()
            .render(&file.path.to_slash_string());

        assert_eq!(rendered, "cmd/api/doc.go");
    }

    #[test]
    fn synthesized_import_lands_after_marker() {
        let service = ServiceInfo::new("billing", "invoices", "example.com/invoices");
        let mut doc = LineDocument::parse(
            "handlers/handlers.go",
            "import (\n\t// portico:extension-point imports/v1\n)\n",
        );

        doc.insert_at_point(
            InsertionPoint::Imports,
            AnchorStyle::ExtensionPoint,
            [snippets::import_line(&service, "proto")],
        )
        .unwrap();

        assert_eq!(
            doc.render(),
            "import (\n\t// portico:extension-point imports/v1\n\tbillingInvoicesProto \"example.com/invoices/proto\"\n)\n"
        );
    }

    #[test]
    fn replacement_written_to_manifest() {
        let service = ServiceInfo::new("billing", "invoices", "example.com/invoices");
        let mut manifest = ModuleManifest::new("example.com/gw/api", "1.22");
        manifest.set_replace(&service.module, &service.local_replacement(3, "services"));

        assert_eq!(
            manifest.replaces()["example.com/invoices"],
            "../../../services/billing/invoices"
        );
    }
}
