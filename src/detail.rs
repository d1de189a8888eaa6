//! Detail builder: one package's record plus checksum, size and declarations.

use std::fs;

use crate::digest::{DEFAULT_CHUNK_SIZE, digest_file_chunked};
use crate::inspector::PackageInspector;
use crate::types::{AppDetailRecord, Checksum};

#[derive(Clone)]
pub struct DetailBuilder {
    inspector: PackageInspector,
    chunk_size: usize,
}

impl DetailBuilder {
    pub fn new(inspector: PackageInspector) -> Self {
        Self {
            inspector,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// `None` only when the package itself cannot be resolved. Every other
    /// failure degrades a single field: checksum to `Unavailable`, size to 0.
    pub fn build_detail(&self, package_id: &str) -> Option<AppDetailRecord> {
        let found = self.inspector.inspect(package_id)?;
        let path = &found.record.file_path;

        let checksum = match digest_file_chunked(path, self.chunk_size) {
            Ok(hex) => Checksum::Sha256(hex),
            Err(e) => {
                log::warn!("checksum of {:?} failed: {}", path, e);
                Checksum::Unavailable(e.to_string())
            }
        };
        // a directory has no package size of its own
        let file_size_bytes = fs::metadata(path)
            .ok()
            .filter(|m| m.is_file())
            .map(|m| m.len())
            .unwrap_or(0);

        Some(AppDetailRecord {
            app: found.record,
            checksum,
            file_size_bytes,
            permissions: found.permissions,
            activities: found.activities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryRegistry;
    use crate::source::tests::record;
    use crate::types::CHECKSUM_UNAVAILABLE;
    use std::sync::Arc;

    fn builder(reg: &Arc<MemoryRegistry>) -> DetailBuilder {
        DetailBuilder::new(PackageInspector::new(reg.clone())).with_chunk_size(16)
    }

    #[test]
    fn test_unknown_package_is_absent() {
        let reg = Arc::new(MemoryRegistry::new());
        assert!(builder(&reg).build_detail("com.nothing").is_none());
    }

    #[test]
    fn test_full_detail() {
        let dir = tempfile::tempdir().unwrap();
        let apk = dir.path().join("base.apk");
        fs::write(&apk, b"abc").unwrap();

        let reg = Arc::new(MemoryRegistry::new());
        let mut rec = record("Calculator", "com.calc", false);
        rec.file_path = apk;
        reg.add_with(
            rec,
            vec!["android.permission.INTERNET".into()],
            vec!["com.calc.MainActivity".into(), "com.calc.Settings".into()],
        );

        let detail = builder(&reg).build_detail("com.calc").unwrap();
        assert_eq!(
            detail.checksum.as_hex(),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
        assert_eq!(detail.file_size_bytes, 3);
        assert_eq!(detail.permissions, vec!["android.permission.INTERNET"]);
        assert_eq!(detail.activities.len(), 2);
        assert_eq!(detail.app.display_name, "Calculator");
    }

    #[test]
    fn test_deleted_file_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let apk = dir.path().join("base.apk");
        fs::write(&apk, b"soon gone").unwrap();

        let reg = Arc::new(MemoryRegistry::new());
        let mut rec = record("Notes", "com.notes", false);
        rec.file_path = apk.clone();
        reg.add(rec);
        fs::remove_file(&apk).unwrap();

        let detail = builder(&reg).build_detail("com.notes").unwrap();
        assert!(matches!(detail.checksum, Checksum::Unavailable(_)));
        assert_eq!(detail.checksum.to_string(), CHECKSUM_UNAVAILABLE);
        assert_eq!(detail.file_size_bytes, 0);
    }

    #[test]
    fn test_directory_path_degrades_size_and_checksum() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("inner"), vec![0u8; 5000]).unwrap();

        let reg = Arc::new(MemoryRegistry::new());
        let mut rec = record("Tool", "com.tool", false);
        rec.file_path = dir.path().to_path_buf();
        reg.add(rec);

        let detail = builder(&reg).build_detail("com.tool").unwrap();
        assert!(!detail.checksum.is_available());
        assert_eq!(detail.file_size_bytes, 0);
    }

    #[test]
    fn test_denied_lists_are_empty() {
        let reg = Arc::new(MemoryRegistry::new());
        reg.add_with(record("Cam", "com.cam", false), vec!["p".into()], vec!["a".into()]);
        reg.hide_details("com.cam");
        let detail = builder(&reg).build_detail("com.cam").unwrap();
        assert!(detail.permissions.is_empty());
        assert!(detail.activities.is_empty());
    }
}
