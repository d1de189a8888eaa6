//! Catalog builder: a full re-scan projected into a sorted list.

use crate::error::Result;
use crate::inspector::PackageInspector;
use crate::types::AppRecord;

/// Scan the registry and sort by case-insensitive display name.
/// Equal names keep their enumeration order.
pub fn build_catalog(inspector: &PackageInspector) -> Result<Vec<AppRecord>> {
    let mut res = inspector.list_installed()?;
    sort_by_display_name(&mut res);
    log::info!("catalog built with {} packages", res.len());
    Ok(res)
}

pub fn sort_by_display_name(records: &mut [AppRecord]) {
    // stable: equal keys keep enumeration order
    records.sort_by_cached_key(|r| r.display_name.to_lowercase());
}
