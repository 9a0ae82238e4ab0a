//! Go source fragments inserted into the gateway, one group per service.

use serde::{Deserialize, Serialize};

use crate::domain::entities::ServiceInfo;

/// How the gateway reaches a backend's gRPC endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointStrategy {
    /// `conf.<Ns><Svc>Host`, backed by an env-configurable config field.
    #[default]
    PerServiceConfig,
    /// Literal `<svc>-svc.<ns>` cluster DNS name; config is not touched.
    FixedServiceDns,
}

impl EndpointStrategy {
    pub fn needs_config_fields(self) -> bool {
        matches!(self, Self::PerServiceConfig)
    }

    /// Go expression evaluating to `host:port` for the service.
    pub fn endpoint_expr(self, service: &ServiceInfo) -> String {
        match self {
            Self::PerServiceConfig => {
                format!("conf.{}+\":\"+conf.GrpcPort", service.host_field())
            }
            Self::FixedServiceDns => {
                format!("\"{}:\"+conf.GrpcPort", service.default_host())
            }
        }
    }
}

/// Aliased import of the service's generated stubs.
pub fn import_line(service: &ServiceInfo, proto_dir: &str) -> String {
    format!(
        "\t{} \"{}\"",
        service.proto_alias(),
        service.proto_import(proto_dir)
    )
}

/// Handler registration for one service, as three lines.
pub fn registration_block(service: &ServiceInfo, strategy: EndpointStrategy) -> Vec<String> {
    vec![
        format!(
            "\tif err := {}.{}(ctx, mux, {}, opts); err != nil {{",
            service.proto_alias(),
            service.register_fn(),
            strategy.endpoint_expr(service)
        ),
        format!(
            "\t\treturn fmt.Errorf(\"failed to register gRPC service {} in namespace {}: %w\", err)",
            service.service_name, service.namespace
        ),
        "\t}".to_string(),
    ]
}

/// Env-driven host field for the gateway `Config` struct.
pub fn config_field(service: &ServiceInfo) -> String {
    format!(
        "\t{} string `env:\"{}\" envDefault:\"{}\"`",
        service.host_field(),
        service.host_env_var(),
        service.default_host()
    )
}
