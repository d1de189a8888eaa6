//! Core data types shared across the application.

use egui::Color32;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Text shown in place of a checksum that could not be computed.
pub const CHECKSUM_UNAVAILABLE: &str = "Error calculating checksum";

/// Icon resource owned by the inspection layer. Records share it through an `Arc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IconHandle {
    path: PathBuf,
}

impl IconHandle {
    pub fn new(path: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self { path: path.into() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One installed package as seen by the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct AppRecord {
    pub display_name: String,
    pub package_id: String,
    pub version_name: String,
    pub version_code: i64,
    pub icon: Option<Arc<IconHandle>>,
    pub is_system_package: bool,
    /// Epoch milliseconds.
    pub installed_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
    pub file_path: PathBuf,
}

/// SHA-256 of a package file, or the reason it is missing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Checksum {
    Sha256(String),
    Unavailable(String),
}

impl Checksum {
    pub fn as_hex(&self) -> Option<&str> {
        match self {
            Checksum::Sha256(hex) => Some(hex),
            Checksum::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Checksum::Sha256(_))
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Checksum::Sha256(hex) => f.write_str(hex),
            Checksum::Unavailable(_) => f.write_str(CHECKSUM_UNAVAILABLE),
        }
    }
}

/// Everything the detail view shows for one package. Built on demand, never cached.
#[derive(Clone, Debug, PartialEq)]
pub struct AppDetailRecord {
    pub app: AppRecord,
    pub checksum: Checksum,
    pub file_size_bytes: u64,
    pub permissions: Vec<String>,
    pub activities: Vec<String>,
}

/// Kind of background task currently running.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskKind {
    Idle,
    RefreshApps,
    LoadDetail(String), // package id
    Launch(String),     // package id
}

/// Progress update message sent from background tasks to the UI.
#[derive(Clone, Debug)]
pub struct ProgressUpdate {
    pub kind: TaskKind,
    pub message: String, // human friendly
    pub finished: bool,  // whether task finished
    pub error: Option<String>,
}

impl ProgressUpdate {
    pub fn started(kind: TaskKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            finished: false,
            error: None,
        }
    }

    pub fn done(kind: TaskKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            finished: true,
            error: None,
        }
    }

    pub fn failed(kind: TaskKind, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            finished: true,
            error: Some(error.into()),
        }
    }
}

pub struct StateColors {
    pub default: Color32,
    pub hover: Color32,
    pub selected: Option<Color32>, // None = use default theme color
}
