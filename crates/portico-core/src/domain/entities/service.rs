//! Backend services as seen by the gateway generator.

use std::path::PathBuf;

use serde::Serialize;

use super::placeholders::path_segments;
use crate::domain::casing;

/// A `<root>/<namespace>/<service>` directory yielded by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLocation {
    pub path: PathBuf,
    pub namespace: String,
    pub name: String,
}

impl ServiceLocation {
    pub fn new(path: impl Into<PathBuf>, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// `namespace/name`, used in logs and error messages.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Result of probing a backend for a gateway-compatible interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exposure {
    /// The service ships gateway stubs. `artifacts` lists the stub file names.
    Exposed { module: String, artifacts: Vec<String> },
    NotExposed,
}

/// An exposed backend service.
///
/// Immutable once created. Every Go identifier and path the injector and the
/// module wirer need is derived from the three fields:
///
/// | derived           | `billing` / `invoices`             |
/// |-------------------|------------------------------------|
/// | alias             | `billingInvoices`                  |
/// | proto alias       | `billingInvoicesProto`             |
/// | host field        | `BillingInvoicesHost`              |
/// | host env var      | `BILLING_INVOICES_HOST`            |
/// | default host      | `invoices-svc.billing`             |
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    pub namespace: String,
    pub service_name: String,
    pub module: String,
}

impl ServiceInfo {
    pub fn new(
        namespace: impl Into<String>,
        service_name: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            service_name: service_name.into(),
            module: module.into(),
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.service_name)
    }

    pub fn alias(&self) -> String {
        format!(
            "{}{}",
            casing::to_camel_case(&self.namespace),
            casing::to_pascal_case(&self.service_name)
        )
    }

    pub fn proto_alias(&self) -> String {
        format!("{}Proto", self.alias())
    }

    /// Name of the Go registration function generated by grpc-gateway.
    pub fn register_fn(&self) -> String {
        format!(
            "Register{}HandlerFromEndpoint",
            casing::to_pascal_case(&self.service_name)
        )
    }

    pub fn host_field(&self) -> String {
        format!(
            "{}{}Host",
            casing::to_pascal_case(&self.namespace),
            casing::to_pascal_case(&self.service_name)
        )
    }

    pub fn host_env_var(&self) -> String {
        format!(
            "{}_{}_HOST",
            casing::to_screaming_snake_case(&self.namespace),
            casing::to_screaming_snake_case(&self.service_name)
        )
    }

    pub fn default_host(&self) -> String {
        format!("{}-svc.{}", self.service_name, self.namespace)
    }

    /// Import path of the generated stubs: `<module>/<proto_dir>`.
    pub fn proto_import(&self, proto_dir: &str) -> String {
        let module = self.module.trim_end_matches('/');
        let dir = proto_dir.trim_matches('/');
        if dir.is_empty() {
            module.to_string()
        } else {
            format!("{module}/{dir}")
        }
    }

    /// Relative path from a gateway `depth` levels below the project root to
    /// this backend: `../../../services/billing/invoices` for depth 3.
    pub fn local_replacement(&self, depth: usize, services_dir: &str) -> String {
        let mut segments: Vec<&str> = Vec::new();
        for seg in path_segments(services_dir)
            .chain(path_segments(&self.namespace))
            .chain(path_segments(&self.service_name))
        {
            if seg == ".." {
                segments.pop();
            } else {
                segments.push(seg);
            }
        }

        let mut out = "../".repeat(depth);
        out.push_str(&segments.join("/"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoices() -> ServiceInfo {
        ServiceInfo::new("billing", "invoices", "example.com/platform/services/billing/invoices")
    }

    #[test]
    fn derives_go_identifiers() {
        let s = invoices();
        assert_eq!(s.alias(), "billingInvoices");
        assert_eq!(s.proto_alias(), "billingInvoicesProto");
        assert_eq!(s.host_field(), "BillingInvoicesHost");
        assert_eq!(s.host_env_var(), "BILLING_INVOICES_HOST");
        assert_eq!(s.default_host(), "invoices-svc.billing");
        assert_eq!(s.register_fn(), "RegisterInvoicesHandlerFromEndpoint");
    }

    #[test]
    fn derives_multi_word_identifiers() {
        let s = ServiceInfo::new("user-data", "profile_store", "m");
        assert_eq!(s.alias(), "userDataProfileStore");
        assert_eq!(s.host_env_var(), "USER_DATA_PROFILE_STORE_HOST");
    }

    #[test]
    fn proto_import_joins_with_slash() {
        assert_eq!(
            invoices().proto_import("proto"),
            "example.com/platform/services/billing/invoices/proto"
        );
        assert_eq!(
            invoices().proto_import("/proto/"),
            "example.com/platform/services/billing/invoices/proto"
        );
    }

    #[test]
    fn local_replacement_is_cleaned() {
        let s = invoices();
        assert_eq!(
            s.local_replacement(3, "services"),
            "../../../services/billing/invoices"
        );
        assert_eq!(
            s.local_replacement(3, "/./services/"),
            "../../../services/billing/invoices"
        );
    }
}
