//! Streaming SHA-256 of package files.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{InspectError, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Hash the file at `path` and return 64 lowercase hex characters.
pub fn digest_file(path: &Path) -> Result<String> {
    digest_file_chunked(path, DEFAULT_CHUNK_SIZE)
}

/// Same as [`digest_file`] with an explicit read chunk size. A size of 0 is treated as 1.
pub fn digest_file_chunked(path: &Path, chunk_size: usize) -> Result<String> {
    let mut file = File::open(path).map_err(|e| InspectError::from_io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; chunk_size.max(1)];
    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(InspectError::from_io(path, e)),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
