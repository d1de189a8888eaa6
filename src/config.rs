use anyhow::{Context, Result};
use home::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::digest::DEFAULT_CHUNK_SIZE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories scanned for application bundles.
    pub scan_dirs: Vec<PathBuf>,
    /// Bundles under any of these count as system packages.
    pub system_dirs: Vec<PathBuf>,
    pub digest_chunk_size: usize,
    pub show_system_apps: bool,
}

impl Default for Config {
    fn default() -> Self {
        let mut scan_dirs = vec![
            PathBuf::from("/Applications"),
            PathBuf::from("/System/Applications"),
        ];
        if let Some(h) = home_dir() {
            scan_dirs.push(h.join("Applications"));
        }
        Self {
            scan_dirs,
            system_dirs: vec![
                PathBuf::from("/System/Applications"),
                PathBuf::from("/System/Library/CoreServices"),
            ],
            digest_chunk_size: DEFAULT_CHUNK_SIZE,
            show_system_apps: false,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".config").join("app-inspector").join("config.toml"))
    }

    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(p) if p.exists() => Self::load(&p),
            _ => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("Read config {:?}", path))?;
        let mut config: Config =
            toml::from_str(&content).with_context(|| format!("Parse config {:?}", path))?;
        config.digest_chunk_size = config.digest_chunk_size.max(1);
        Ok(config)
    }
}
