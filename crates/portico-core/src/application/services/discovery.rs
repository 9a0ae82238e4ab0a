//! Exposure detection: which backends does the gateway front?

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::application::{
    ApplicationError,
    ports::{ExposureProbe, Filesystem},
    services::walker,
};
use crate::domain::{
    DomainError, DomainValidator as validator, Exposure, GatewayLayout, ModuleManifest, PipelinePolicy,
    ServiceInfo, ServiceLocation,
};
use crate::error::PorticoResult;

/// Default probe: a service is exposed when `<service>/<proto_dir>` holds at
/// least one file ending in the stub suffix (`.gw.go`).
///
/// The module path of an exposed service is read from its own manifest.
pub struct GatewayStubProbe<'a> {
    filesystem: &'a dyn Filesystem,
    layout: &'a GatewayLayout,
}

impl<'a> GatewayStubProbe<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, layout: &'a GatewayLayout) -> Self {
        Self { filesystem, layout }
    }

    fn stubs(&self, location: &ServiceLocation) -> PorticoResult<Vec<String>> {
        let proto = location.path.join(&self.layout.proto_dir);
        if !self.filesystem.exists(&proto) {
            return Ok(Vec::new());
        }

        let mut stubs: Vec<String> = self
            .filesystem
            .list_dir(&proto)?
            .into_iter()
            .filter(|e| !e.is_dir && e.name.ends_with(&self.layout.stub_suffix))
            .map(|e| e.name)
            .collect();
        stubs.sort();
        Ok(stubs)
    }

    fn module(&self, location: &ServiceLocation) -> PorticoResult<String> {
        let path = location.path.join(&self.layout.manifest_file);
        let discovery_error = |reason: String| ApplicationError::Discovery {
            service: location.qualified_name(),
            reason,
        };

        let text = self
            .filesystem
            .read_to_string(&path)
            .map_err(|e| discovery_error(format!("cannot read {}: {e}", path.display())))?;

        let manifest = ModuleManifest::parse(&path.display().to_string(), &text)
            .map_err(|e| discovery_error(e.to_string()))?;

        Ok(manifest.module_name().to_string())
    }
}

impl ExposureProbe for GatewayStubProbe<'_> {
    fn probe(&self, location: &ServiceLocation) -> PorticoResult<Exposure> {
        let artifacts = self.stubs(location)?;
        if artifacts.is_empty() {
            return Ok(Exposure::NotExposed);
        }
        Ok(Exposure::Exposed {
            module: self.module(location)?,
            artifacts,
        })
    }
}

/// Walks the services tree and collects exposed services in walk order.
pub struct ExposureDetector<'a> {
    filesystem: &'a dyn Filesystem,
    probe: &'a dyn ExposureProbe,
    policy: &'a PipelinePolicy,
}

impl<'a> ExposureDetector<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        probe: &'a dyn ExposureProbe,
        policy: &'a PipelinePolicy,
    ) -> Self {
        Self {
            filesystem,
            probe,
            policy,
        }
    }

    #[instrument(skip_all, fields(root = %services_root.display()))]
    pub fn discover(&self, services_root: &Path) -> PorticoResult<Vec<ServiceInfo>> {
        let mut exposed = Vec::new();

        walker::walk_all(self.filesystem, services_root, |location| {
            if self.policy.is_skipped_namespace(&location.namespace) {
                debug!(service = %location.qualified_name(), "reserved namespace, skipped");
                return Ok(());
            }

            match self.probe.probe(location)? {
                Exposure::Exposed { module, artifacts } => {
                    debug!(
                        service = %location.qualified_name(),
                        module = %module,
                        stubs = artifacts.len(),
                        "exposed"
                    );
                    exposed.push(ServiceInfo::new(&location.namespace, &location.name, module));
                }
                Exposure::NotExposed => {
                    debug!(service = %location.qualified_name(), "not exposed");
                }
            }
            Ok(())
        })?;

        validator::validate_unique_aliases(&exposed).map_err(|e| ApplicationError::Discovery {
            service: match &e {
                DomainError::AliasCollision { second, .. } => second.clone(),
                other => other.to_string(),
            },
            reason: e.to_string(),
        })?;

        info!(count = exposed.len(), "Discovered exposed services");
        Ok(exposed)
    }
}
