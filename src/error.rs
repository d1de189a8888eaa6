//! Error taxonomy for package inspection.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectError {
    /// The package vanished between enumeration and lookup.
    #[error("package not found: {0}")]
    NotFound(String),
    #[error("cannot read {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("cannot launch {0}")]
    LaunchFailed(String),
    /// The registry as a whole could not be enumerated.
    #[error("package registry unavailable: {0}")]
    Registry(String),
}

impl InspectError {
    /// Map an IO failure on `path` onto the taxonomy.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::PermissionDenied => InspectError::AccessDenied(path.display().to_string()),
            _ => InspectError::Unreadable { path, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, InspectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_maps_permission_denied() {
        let err = InspectError::from_io(
            "/Applications/Locked.app",
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(matches!(err, InspectError::AccessDenied(_)));

        let err = InspectError::from_io("/missing", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(err, InspectError::Unreadable { .. }));
        assert!(err.to_string().contains("/missing"));
    }
}
