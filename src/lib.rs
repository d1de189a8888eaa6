//! Installed application inspector.
//!
//! Enumerates installed packages through a [`source::PackageSource`], keeps a
//! searchable catalog in a [`store::CollectionStore`] and builds per-package
//! details (checksum, size, permissions, activities) on demand.

pub mod bundles;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod digest;
pub mod error;
pub mod format;
pub mod inspector;
pub mod launch;
pub mod source;
pub mod store;
pub mod style;
pub mod types;
pub mod ui;
