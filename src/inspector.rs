//! Defensive reads over a [`PackageSource`].

use std::sync::Arc;

use crate::error::{InspectError, Result};
use crate::source::PackageSource;
use crate::types::AppRecord;

/// A package record together with its declared permissions and activities.
#[derive(Clone, Debug, PartialEq)]
pub struct Inspection {
    pub record: AppRecord,
    pub permissions: Vec<String>,
    pub activities: Vec<String>,
}

#[derive(Clone)]
pub struct PackageInspector {
    source: Arc<dyn PackageSource>,
}

impl PackageInspector {
    pub fn new(source: Arc<dyn PackageSource>) -> Self {
        Self { source }
    }

    /// Every package whose metadata resolves, in registry order.
    ///
    /// Packages that fail to resolve are dropped; only a failure to enumerate
    /// the registry at all is reported.
    pub fn list_installed(&self) -> Result<Vec<AppRecord>> {
        let ids = self.source.package_ids()?;
        let total = ids.len();
        let mut res = Vec::with_capacity(total);
        for id in ids {
            match self.source.package(&id) {
                Ok(record) => res.push(record),
                Err(e) => log::debug!("skipping {}: {}", id, e),
            }
        }
        if res.len() < total {
            log::info!("listed {} of {} packages", res.len(), total);
        }
        Ok(res)
    }

    /// Resolve one package. Missing permission or activity data degrades to empty lists.
    pub fn inspect(&self, package_id: &str) -> Option<Inspection> {
        let record = match self.source.package(package_id) {
            Ok(r) => r,
            Err(e) => {
                log::debug!("inspect {}: {}", package_id, e);
                return None;
            }
        };
        let permissions = self.or_empty(package_id, "permissions", self.source.permissions(package_id));
        let activities = self.or_empty(package_id, "activities", self.source.activities(package_id));
        Some(Inspection {
            record,
            permissions,
            activities,
        })
    }

    fn or_empty(&self, package_id: &str, what: &str, res: Result<Vec<String>>) -> Vec<String> {
        res.unwrap_or_else(|e: InspectError| {
            log::warn!("no {} for {}: {}", what, package_id, e);
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryRegistry;
    use crate::source::tests::record;

    fn setup() -> (Arc<MemoryRegistry>, PackageInspector) {
        let reg = Arc::new(MemoryRegistry::new());
        let inspector = PackageInspector::new(reg.clone());
        (reg, inspector)
    }

    #[test]
    fn test_list_skips_unresolvable() {
        let (reg, inspector) = setup();
        reg.add(record("Notes", "com.notes", false));
        reg.add_ghost("com.uninstalled");
        reg.add(record("Locked", "com.locked", false));
        reg.deny("com.locked");
        reg.add(record("Calc", "com.calc", true));

        let names: Vec<_> = inspector
            .list_installed()
            .unwrap()
            .into_iter()
            .map(|r| r.display_name)
            .collect();
        assert_eq!(names, vec!["Notes", "Calc"]);
    }

    #[test]
    fn test_list_propagates_registry_failure() {
        let (reg, inspector) = setup();
        reg.set_registry_error(Some("offline"));
        assert!(matches!(inspector.list_installed(), Err(InspectError::Registry(_))));
    }

    #[test]
    fn test_inspect() {
        let (reg, inspector) = setup();
        reg.add_with(
            record("Cam", "com.cam", false),
            vec!["android.permission.CAMERA".into()],
            vec!["com.cam.MainActivity".into()],
        );
        let found = inspector.inspect("com.cam").unwrap();
        assert_eq!(found.record.package_id, "com.cam");
        assert_eq!(found.permissions, vec!["android.permission.CAMERA"]);
        assert_eq!(found.activities, vec!["com.cam.MainActivity"]);

        assert!(inspector.inspect("com.missing").is_none());
        reg.deny("com.cam");
        assert!(inspector.inspect("com.cam").is_none());
    }

    #[test]
    fn test_inspect_degrades_lists() {
        let (reg, inspector) = setup();
        reg.add_with(record("Cam", "com.cam", false), vec!["x".into()], vec!["y".into()]);
        reg.hide_details("com.cam");
        let found = inspector.inspect("com.cam").unwrap();
        assert!(found.permissions.is_empty());
        assert!(found.activities.is_empty());
    }
}
