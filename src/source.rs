//! Host collaborators: the package registry and the entry-point launcher.
//!
//! The registry is live and externally mutable: packages may appear or vanish
//! between two calls. Implementations answer each query independently and the
//! inspector above them decides what to skip.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::error::{InspectError, Result};
use crate::types::AppRecord;

/// Read-only view of the host's installed-package registry.
pub trait PackageSource: Send + Sync {
    /// Identifiers of every package currently visible, in registry order.
    fn package_ids(&self) -> Result<Vec<String>>;

    /// Resolve the metadata of one package.
    fn package(&self, package_id: &str) -> Result<AppRecord>;

    /// Declared permissions, in declaration order.
    fn permissions(&self, package_id: &str) -> Result<Vec<String>>;

    /// Fully-qualified names of declared activities / entry points.
    fn activities(&self, package_id: &str) -> Result<Vec<String>>;
}

/// Starts a package's default entry point.
pub trait Launcher: Send + Sync {
    fn start(&self, package_id: &str) -> Result<()>;
}

#[derive(Clone, Debug)]
struct MemoryPackage {
    record: Option<AppRecord>,
    permissions: Option<Vec<String>>,
    activities: Option<Vec<String>>,
    launchable: bool,
}

#[derive(Default)]
struct MemoryInner {
    order: Vec<String>,
    packages: HashMap<String, MemoryPackage>,
    denied: HashSet<String>,
    registry_error: Option<String>,
    launched: Vec<String>,
}

/// In-memory registry for tests and embedding.
#[derive(Default)]
pub struct MemoryRegistry {
    inner: Mutex<MemoryInner>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut MemoryInner) -> R) -> R {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut inner)
    }

    fn put(&self, id: String, pkg: MemoryPackage) {
        self.with(|inner| {
            if !inner.packages.contains_key(&id) {
                inner.order.push(id.clone());
            }
            inner.packages.insert(id, pkg);
        });
    }

    /// Add a launchable package with no permissions or activities.
    pub fn add(&self, record: AppRecord) {
        self.add_with(record, Vec::new(), Vec::new());
    }

    pub fn add_with(&self, record: AppRecord, permissions: Vec<String>, activities: Vec<String>) {
        self.put(
            record.package_id.clone(),
            MemoryPackage {
                record: Some(record),
                permissions: Some(permissions),
                activities: Some(activities),
                launchable: true,
            },
        );
    }

    /// A package that is listed but whose metadata no longer resolves.
    pub fn add_ghost(&self, package_id: &str) {
        self.put(
            package_id.to_string(),
            MemoryPackage {
                record: None,
                permissions: None,
                activities: None,
                launchable: false,
            },
        );
    }

    pub fn remove(&self, package_id: &str) {
        self.with(|inner| {
            inner.packages.remove(package_id);
            inner.order.retain(|id| id != package_id);
        });
    }

    /// Refuse every metadata query for `package_id`.
    pub fn deny(&self, package_id: &str) {
        self.with(|inner| {
            inner.denied.insert(package_id.to_string());
        });
    }

    /// Keep the base record resolvable but refuse permission and activity queries.
    pub fn hide_details(&self, package_id: &str) {
        self.with(|inner| {
            if let Some(pkg) = inner.packages.get_mut(package_id) {
                pkg.permissions = None;
                pkg.activities = None;
            }
        });
    }

    pub fn set_launchable(&self, package_id: &str, launchable: bool) {
        self.with(|inner| {
            if let Some(pkg) = inner.packages.get_mut(package_id) {
                pkg.launchable = launchable;
            }
        });
    }

    /// Make enumeration itself fail (`Some`) or succeed again (`None`).
    pub fn set_registry_error(&self, error: Option<&str>) {
        self.with(|inner| inner.registry_error = error.map(str::to_string));
    }

    /// Package ids passed to [`Launcher::start`] that were started.
    pub fn launched(&self) -> Vec<String> {
        self.with(|inner| inner.launched.clone())
    }

    fn lookup<T>(&self, package_id: &str, pick: impl FnOnce(&MemoryPackage) -> Option<T>) -> Result<T> {
        self.with(|inner| {
            if inner.denied.contains(package_id) {
                return Err(InspectError::AccessDenied(package_id.to_string()));
            }
            let pkg = inner
                .packages
                .get(package_id)
                .filter(|p| p.record.is_some())
                .ok_or_else(|| InspectError::NotFound(package_id.to_string()))?;
            pick(pkg).ok_or_else(|| InspectError::AccessDenied(package_id.to_string()))
        })
    }
}

impl PackageSource for MemoryRegistry {
    fn package_ids(&self) -> Result<Vec<String>> {
        self.with(|inner| match &inner.registry_error {
            Some(msg) => Err(InspectError::Registry(msg.clone())),
            None => Ok(inner.order.clone()),
        })
    }

    fn package(&self, package_id: &str) -> Result<AppRecord> {
        self.lookup(package_id, |p| p.record.clone())
    }

    fn permissions(&self, package_id: &str) -> Result<Vec<String>> {
        self.lookup(package_id, |p| p.permissions.clone())
    }

    fn activities(&self, package_id: &str) -> Result<Vec<String>> {
        self.lookup(package_id, |p| p.activities.clone())
    }
}

impl Launcher for MemoryRegistry {
    fn start(&self, package_id: &str) -> Result<()> {
        self.with(|inner| {
            let launchable = inner
                .packages
                .get(package_id)
                .is_some_and(|p| p.record.is_some() && p.launchable);
            if !launchable || inner.denied.contains(package_id) {
                return Err(InspectError::LaunchFailed(package_id.to_string()));
            }
            inner.launched.push(package_id.to_string());
            Ok(())
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    pub(crate) fn record(name: &str, id: &str, system: bool) -> AppRecord {
        AppRecord {
            display_name: name.to_string(),
            package_id: id.to_string(),
            version_name: "1.0".to_string(),
            version_code: 1,
            icon: None,
            is_system_package: system,
            installed_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_000,
            file_path: PathBuf::from(format!("/data/app/{id}/base.apk")),
        }
    }

    #[test]
    fn test_enumeration_keeps_insertion_order() {
        let reg = MemoryRegistry::new();
        reg.add(record("Zoo", "com.zoo", false));
        reg.add(record("App", "com.app", true));
        reg.add_ghost("com.ghost");
        assert_eq!(reg.package_ids().unwrap(), vec!["com.zoo", "com.app", "com.ghost"]);

        reg.remove("com.zoo");
        assert_eq!(reg.package_ids().unwrap(), vec!["com.app", "com.ghost"]);
    }

    #[test]
    fn test_lookup_errors() {
        let reg = MemoryRegistry::new();
        reg.add(record("Notes", "com.notes", false));
        reg.add_ghost("com.ghost");
        reg.deny("com.notes");

        assert!(matches!(reg.package("com.notes"), Err(InspectError::AccessDenied(_))));
        assert!(matches!(reg.package("com.ghost"), Err(InspectError::NotFound(_))));
        assert!(matches!(reg.package("com.none"), Err(InspectError::NotFound(_))));
    }

    #[test]
    fn test_hidden_details() {
        let reg = MemoryRegistry::new();
        reg.add_with(record("Cam", "com.cam", false), vec!["android.permission.CAMERA".into()], vec![]);
        assert_eq!(reg.permissions("com.cam").unwrap().len(), 1);
        reg.hide_details("com.cam");
        assert!(reg.package("com.cam").is_ok());
        assert!(matches!(reg.permissions("com.cam"), Err(InspectError::AccessDenied(_))));
    }

    #[test]
    fn test_launch_records_requests() {
        let reg = MemoryRegistry::new();
        reg.add(record("Cam", "com.cam", false));
        reg.add(record("Svc", "com.svc", true));
        reg.set_launchable("com.svc", false);

        assert!(reg.start("com.cam").is_ok());
        assert!(matches!(reg.start("com.svc"), Err(InspectError::LaunchFailed(_))));
        assert!(reg.start("com.none").is_err());
        assert_eq!(reg.launched(), vec!["com.cam"]);
    }

    #[test]
    fn test_registry_error() {
        let reg = MemoryRegistry::new();
        reg.set_registry_error(Some("binder died"));
        assert!(matches!(reg.package_ids(), Err(InspectError::Registry(_))));
        reg.set_registry_error(None);
        assert!(reg.package_ids().unwrap().is_empty());
    }
}
