//! Two-level walk over `<root>/<namespace>/<service>` directories.

use std::path::Path;

use tracing::trace;

use crate::application::ports::{DirEntry, Filesystem};
use crate::domain::ServiceLocation;
use crate::error::PorticoResult;

/// Visit every service directory under `root`.
///
/// Namespaces and services are visited in lexical order. Hidden entries and
/// plain files are skipped at both levels. The first visitor error stops the
/// walk and is returned unchanged.
pub fn walk_all<F>(fs: &dyn Filesystem, root: &Path, mut visit: F) -> PorticoResult<()>
where
    F: FnMut(&ServiceLocation) -> PorticoResult<()>,
{
    for namespace in subdirectories(fs, root)? {
        let ns_path = root.join(&namespace);
        for service in subdirectories(fs, &ns_path)? {
            let location = ServiceLocation::new(ns_path.join(&service), &namespace, service);
            trace!(service = %location.qualified_name(), "visiting");
            visit(&location)?;
        }
    }
    Ok(())
}

fn subdirectories(fs: &dyn Filesystem, dir: &Path) -> PorticoResult<Vec<String>> {
    let mut names: Vec<String> = fs
        .list_dir(dir)?
        .into_iter()
        .filter(|e| e.is_dir && !e.is_hidden())
        .map(|DirEntry { name, .. }| name)
        .collect();
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::FakeFs;
    use crate::application::ApplicationError;
    use crate::error::PorticoError;

    fn tree() -> FakeFs {
        FakeFs::new()
            .with_dir("/p/services/billing/payments")
            .with_dir("/p/services/billing/invoices")
            .with_dir("/p/services/auth/users")
            .with_dir("/p/services/.git/objects")
            .with_dir("/p/services/auth/.cache")
            .with_file("/p/services/README.md", "")
            .with_file("/p/services/auth/notes.txt", "")
    }

    #[test]
    fn visits_in_lexical_order_skipping_hidden_and_files() {
        let fs = tree();
        let mut seen = Vec::new();
        walk_all(&fs, Path::new("/p/services"), |loc| {
            seen.push(loc.qualified_name());
            Ok(())
        })
        .unwrap();

        assert_eq!(seen, vec!["auth/users", "billing/invoices", "billing/payments"]);
    }

    #[test]
    fn location_carries_full_path() {
        let fs = tree();
        let mut paths = Vec::new();
        walk_all(&fs, Path::new("/p/services"), |loc| {
            paths.push(loc.path.clone());
            Ok(())
        })
        .unwrap();
        assert_eq!(paths[0], Path::new("/p/services/auth/users"));
    }

    #[test]
    fn stops_on_first_visitor_error() {
        let fs = tree();
        let mut count = 0;
        let result = walk_all(&fs, Path::new("/p/services"), |_| {
            count += 1;
            Err(PorticoError::Internal {
                message: "stop".into(),
            })
        });

        assert!(matches!(result, Err(PorticoError::Internal { .. })));
        assert_eq!(count, 1);
    }

    #[test]
    fn missing_root_is_an_io_error() {
        let fs = FakeFs::new();
        let result = walk_all(&fs, Path::new("/nope"), |_| Ok(()));
        assert!(matches!(
            result,
            Err(PorticoError::Application(ApplicationError::Filesystem { .. }))
        ));
    }
}
