//! Module Wirer - points the gateway module at local backend checkouts.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::application::ports::ModuleTool;
use crate::domain::{PlaceholderSet, ServiceInfo};
use crate::error::PorticoResult;

pub struct ModuleWirer<'a> {
    modules: &'a dyn ModuleTool,
}

impl<'a> ModuleWirer<'a> {
    pub fn new(modules: &'a dyn ModuleTool) -> Self {
        Self { modules }
    }

    /// `init`, one `replace` per service in order, then `tidy`.
    ///
    /// Replacement paths are relative to a directory at the gateway's depth
    /// below the project root. No rollback: a failed step leaves the module
    /// as the previous steps left it.
    #[instrument(skip_all, fields(target = %target_dir.display(), module = %placeholders.service_fqn()))]
    pub fn wire(
        &self,
        target_dir: &Path,
        placeholders: &PlaceholderSet,
        services: &[ServiceInfo],
    ) -> PorticoResult<()> {
        self.modules.init(target_dir, placeholders.service_fqn())?;

        let depth = placeholders.service_depth();
        for service in services {
            let local = service.local_replacement(depth, placeholders.services_directory());
            debug!(backend = %service.module, path = %local, "replace");
            self.modules.replace(target_dir, &service.module, &local)?;
        }

        self.modules.tidy(target_dir)?;
        info!(replaces = services.len(), "Gateway module wired");
        Ok(())
    }
}
