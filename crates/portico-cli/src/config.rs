//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only receives the
//! [`GatewayLayout`] and [`PipelinePolicy`] derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `PORTICO__<SECTION>__<KEY>` environment variables
//! 3. Config file (`--config`, then `.portico.toml` in the CWD, then the
//!    platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use portico_core::domain::{AnchorStyle, EndpointStrategy, GatewayLayout, PipelinePolicy};

/// File name of a project-local configuration.
pub const LOCAL_CONFIG: &str = ".portico.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Workspace identity used to derive module paths.
    pub project: ProjectConfig,
    /// Well-known paths inside backends and the gateway.
    pub layout: GatewayLayout,
    /// Pipeline behaviour.
    pub generation: GenerationConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Template settings.
    pub templates: TemplateConfig,
    /// External tools.
    pub toolchain: ToolchainConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Module path prefix, e.g. `github.com/acme/platform`.
    pub remote: String,
    pub registry: String,
    pub branch: String,
    pub version: String,
    pub services_dir: String,
    /// Namespace gateways are created in when `--namespace` is absent.
    pub namespace: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            remote: String::new(),
            registry: String::new(),
            branch: "main".into(),
            version: "0.1.0".into(),
            services_dir: "services".into(),
            namespace: "gateway".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub endpoint: EndpointStrategy,
    pub anchors: AnchorStyle,
    pub skip_default_namespace: bool,
    pub reserved_namespace: String,
    pub register_workspace: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let policy = PipelinePolicy::default();
        Self {
            endpoint: policy.endpoint,
            anchors: policy.anchors,
            skip_default_namespace: policy.skip_default_namespace,
            reserved_namespace: policy.reserved_namespace,
            register_workspace: policy.register_workspace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Template root overriding the built-in templates.
    pub local_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Explicit `go` binary; looked up on `PATH` when unset.
    pub go_binary: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then the
    /// environment.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to seed configuration defaults")?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(
                config::File::new(&path.to_string_lossy(), config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix("PORTICO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Path of the configuration file used when `--config` is absent.
    ///
    /// `.portico.toml` in the current directory wins when it exists,
    /// otherwise the platform config dir (via `directories::ProjectDirs`).
    pub fn config_path() -> PathBuf {
        let local = PathBuf::from(LOCAL_CONFIG);
        if local.exists() {
            return local;
        }
        Self::global_path().unwrap_or(local)
    }

    /// `<platform config dir>/portico/config.toml`, if a home dir exists.
    pub fn global_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "portico", "portico")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// Layout handed to the core pipeline.
    pub fn layout(&self) -> GatewayLayout {
        self.layout.clone()
    }

    /// Policy handed to the core pipeline.  `overwrite` defaults to on and
    /// is only switched off by `--no-overwrite`.
    pub fn policy(&self) -> PipelinePolicy {
        PipelinePolicy {
            skip_default_namespace: self.generation.skip_default_namespace,
            reserved_namespace: self.generation.reserved_namespace.clone(),
            endpoint: self.generation.endpoint,
            anchors: self.generation.anchors,
            register_workspace: self.generation.register_workspace,
            ..PipelinePolicy::default()
        }
    }

    /// Look up a dotted key (`layout.proto_dir`) and render it as text.
    pub fn get(&self, key: &str) -> Option<String> {
        let tree = serde_json::to_value(self).ok()?;
        let value = key
            .split('.')
            .try_fold(&tree, |node, part| node.get(part))?;
        Some(match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_follow_core_policy() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.policy(), PipelinePolicy::default());
        assert_eq!(cfg.project.services_dir, "services");
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn missing_optional_file_returns_defaults() {
        let temp = TempDir::new().unwrap();
        let cfg = AppConfig::load_from(&temp.path().join("none.toml"), false).unwrap();
        assert_eq!(cfg.project, ProjectConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("none.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("portico.toml");
        std::fs::write(
            &path,
            "[project]\nremote = \"github.com/acme/platform\"\n\n\
             [generation]\nendpoint = \"fixed-service-dns\"\nanchors = \"legacy\"\n\n\
             [layout]\nproto_dir = \"api\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(&path, true).unwrap();

        assert_eq!(cfg.project.remote, "github.com/acme/platform");
        assert_eq!(cfg.project.branch, "main");
        assert_eq!(cfg.generation.endpoint, EndpointStrategy::FixedServiceDns);
        assert_eq!(cfg.generation.anchors, AnchorStyle::Legacy);
        assert_eq!(cfg.layout.proto_dir, "api");
        assert_eq!(cfg.layout.stub_suffix, ".gw.go");
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn get_walks_dotted_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("layout.proto_dir").as_deref(), Some("proto"));
        assert_eq!(cfg.get("generation.endpoint").as_deref(), Some("per-service-config"));
        assert_eq!(cfg.get("generation.register_workspace").as_deref(), Some("true"));
        assert_eq!(cfg.get("toolchain.go_binary").as_deref(), Some(""));
        assert_eq!(cfg.get("nope.key"), None);
    }
}
