//! Layout conventions and pipeline switches.

use serde::{Deserialize, Serialize};

use crate::domain::{document::AnchorStyle, snippets::EndpointStrategy};

/// Well-known relative paths inside backends, the gateway and the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayLayout {
    /// Backend directory holding generated stubs.
    pub proto_dir: String,
    /// File suffix marking a gateway stub.
    pub stub_suffix: String,
    pub handlers_file: String,
    pub config_file: String,
    pub manifest_file: String,
    pub template_subdir: String,
    pub workflow_template_subdir: String,
    pub workflow_dir: String,
}

impl Default for GatewayLayout {
    fn default() -> Self {
        Self {
            proto_dir: "proto".into(),
            stub_suffix: ".gw.go".into(),
            handlers_file: "handlers/handlers.go".into(),
            config_file: "config/config.go".into(),
            manifest_file: "go.mod".into(),
            template_subdir: "go".into(),
            workflow_template_subdir: "workflows".into(),
            workflow_dir: ".github/workflows".into(),
        }
    }
}

impl GatewayLayout {
    /// `<workflow_dir>/<namespace>-<name>.yml`
    pub fn workflow_file(&self, namespace: &str, name: &str) -> String {
        format!(
            "{}/{}-{}.yml",
            self.workflow_dir.trim_end_matches('/'),
            namespace,
            name
        )
    }
}

/// Behavior switches for a `create` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelinePolicy {
    pub skip_default_namespace: bool,
    pub reserved_namespace: String,
    pub endpoint: EndpointStrategy,
    pub anchors: AnchorStyle,
    /// Replace an existing gateway instead of failing with `AlreadyExists`.
    pub overwrite: bool,
    pub register_workspace: bool,
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self {
            skip_default_namespace: true,
            reserved_namespace: "default".into(),
            endpoint: EndpointStrategy::default(),
            anchors: AnchorStyle::default(),
            overwrite: true,
            register_workspace: true,
        }
    }
}

impl PipelinePolicy {
    pub fn is_skipped_namespace(&self, namespace: &str) -> bool {
        self.skip_default_namespace && namespace == self.reserved_namespace
    }
}
