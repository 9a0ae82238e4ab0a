//! Placeholder derivation from command-line arguments.
//!
//! The core pipeline consumes a finished [`PlaceholderSet`]; this is the one
//! place that decides how a gateway name, namespace and workspace settings
//! turn into module paths and directories.

use std::path::Path;

use portico_core::domain::PlaceholderSet;

use crate::error::{CliError, CliResult};

/// Inputs for a gateway's placeholders, after config and flags are merged.
#[derive(Debug, Clone)]
pub struct GatewayRequest<'a> {
    pub root: &'a Path,
    pub name: &'a str,
    pub namespace: &'a str,
    pub services_dir: &'a str,
    pub remote: &'a str,
    pub registry: &'a str,
    pub branch: &'a str,
    pub version: &'a str,
}

impl GatewayRequest<'_> {
    /// Build the placeholder set.
    ///
    /// The name keeps only ASCII letters. Module paths are
    /// `<remote>/<services_dir>/<namespace>/<name>`; the gateway directory is
    /// `<services_dir>/<namespace>/<name>` under the workspace root.
    pub fn placeholders(&self) -> CliResult<PlaceholderSet> {
        let name = letters_only(self.name);
        if name.is_empty() {
            return Err(CliError::InvalidGatewayName {
                name: self.name.to_string(),
                reason: "must contain at least one ASCII letter".into(),
            });
        }
        let remote = self.remote.trim().trim_end_matches('/');
        if remote.is_empty() {
            return Err(CliError::MissingRemote);
        }
        let services_dir = self.services_dir.trim_matches('/');

        let services_fqn = join_url(&[remote, services_dir]);
        let service_fqn = join_url(&[&services_fqn, self.namespace, &name]);
        let project_name = self
            .root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| name.clone());

        PlaceholderSet::builder()
            .project_root(self.root.to_string_lossy())
            .project_name(project_name)
            .project_directory(".")
            .project_fqn(remote)
            .registry(self.registry)
            .remote(remote)
            .branch(self.branch)
            .version(self.version)
            .services_fqn(services_fqn)
            .services_directory(services_dir)
            .gateway_service_name(name.as_str())
            .gateway_fqn(service_fqn.as_str())
            .libs_fqn(join_url(&[remote, "libs"]))
            .libs_directory("libs")
            .infra_directory("infra")
            .service_namespace(self.namespace)
            .service_versioned_namespace(format!("{}/v1", self.namespace))
            .service_name(name.as_str())
            .service_fqn(service_fqn)
            .service_directory(format!("{services_dir}/{}/{name}", self.namespace))
            .proto_package(format!("{}.{name}.v1", self.namespace))
            .build()
            .map_err(|e| CliError::Core(e.into()))
    }
}

/// Placeholders for read-only discovery.
///
/// Discovery only looks at `<root>/<services_dir>`, so the gateway identity
/// is a fixed stand-in and no remote is needed.
pub fn discovery_placeholders(root: &Path, services_dir: &str) -> CliResult<PlaceholderSet> {
    let services_dir = services_dir.trim_matches('/');
    PlaceholderSet::builder()
        .project_root(root.to_string_lossy())
        .services_directory(services_dir)
        .service_namespace("discover")
        .service_name("discover")
        .service_fqn("discover")
        .service_directory(format!("{services_dir}/discover/discover"))
        .build()
        .map_err(|e| CliError::Core(e.into()))
}

fn letters_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphabetic).collect()
}

/// Join URL-ish segments with single slashes, dropping empty ones.
fn join_url(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(name: &'a str, remote: &'a str) -> GatewayRequest<'a> {
        GatewayRequest {
            root: Path::new("/nonexistent-workspace"),
            name,
            namespace: "gw",
            services_dir: "services",
            remote,
            registry: "ghcr.io/acme",
            branch: "main",
            version: "0.1.0",
        }
    }

    #[test]
    fn derives_module_paths_and_directories() {
        let set = request("api", "github.com/acme/platform/")
            .placeholders()
            .unwrap();

        assert_eq!(set.services_fqn(), "github.com/acme/platform/services");
        assert_eq!(set.service_fqn(), "github.com/acme/platform/services/gw/api");
        assert_eq!(set.service_directory(), "services/gw/api");
        assert_eq!(set.registry_server(), "ghcr.io");
        assert_eq!(set.service_depth(), 3);
        assert_eq!(set.project_name(), "api");
    }

    #[test]
    fn name_is_reduced_to_letters() {
        let set = request("user-api_2", "example.com/x").placeholders().unwrap();
        assert_eq!(set.service_name(), "userapi");
    }

    #[test]
    fn name_without_letters_is_rejected() {
        assert!(matches!(
            request("123", "example.com/x").placeholders(),
            Err(CliError::InvalidGatewayName { .. })
        ));
    }

    #[test]
    fn remote_is_required() {
        assert!(matches!(
            request("api", "  ").placeholders(),
            Err(CliError::MissingRemote)
        ));
    }

    #[test]
    fn discovery_needs_no_remote() {
        let set = discovery_placeholders(Path::new("/ws"), "services/").unwrap();
        assert_eq!(set.project_root(), "/ws");
        assert_eq!(set.services_directory(), "services");
    }

    #[test]
    fn join_url_drops_empty_segments() {
        assert_eq!(join_url(&["a/", "", "/b", "c"]), "a/b/c");
    }
}
