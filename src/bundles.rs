//! Host registry backed by application bundles on disk.
//!
//! Each immediate `*.app` child of a scan directory is one package. Metadata
//! comes from `Contents/Info.plist`; the package file is the bundle's main
//! executable. Nothing is cached except the id -> bundle path index and the
//! shared icon handles.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use plist::{Dictionary, Value};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{InspectError, Result};
use crate::source::{Launcher, PackageSource};
use crate::types::{AppRecord, IconHandle};

const NESTED_BUNDLE_EXTS: &[&str] = &["app", "appex", "xpc"];
const NESTED_MAX_DEPTH: usize = 4;

pub struct BundleRegistry {
    scan_dirs: Vec<PathBuf>,
    system_dirs: Vec<PathBuf>,
    index: RwLock<HashMap<String, PathBuf>>,
    icons: Mutex<HashMap<PathBuf, Arc<IconHandle>>>,
}

impl BundleRegistry {
    pub fn new(scan_dirs: Vec<PathBuf>, system_dirs: Vec<PathBuf>) -> Self {
        Self {
            scan_dirs,
            system_dirs,
            index: RwLock::new(HashMap::new()),
            icons: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.scan_dirs.clone(), config.system_dirs.clone())
    }

    fn is_system(&self, bundle: &Path) -> bool {
        self.system_dirs.iter().any(|d| bundle.starts_with(d))
    }

    /// Walk the scan dirs, rebuild the index and return (id, bundle) pairs in scan order.
    fn scan(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut res: Vec<(String, PathBuf)> = Vec::new();
        let mut index = HashMap::new();
        let mut readable = 0usize;

        for d in &self.scan_dirs {
            let bundles = match bundles_in_dir(d) {
                Ok(b) => b,
                Err(e) => {
                    log::debug!("cannot scan {:?}: {}", d, e);
                    continue;
                }
            };
            readable += 1;
            for p in bundles {
                let id = match read_info_plist(&p) {
                    Ok(dict) => package_id_for(&p, &dict),
                    Err(_) => p.to_string_lossy().to_string(),
                };
                if index.contains_key(&id) {
                    log::debug!("duplicate package {} at {:?}", id, p);
                    continue;
                }
                index.insert(id.clone(), p.clone());
                res.push((id, p));
            }
        }

        if readable == 0 && !self.scan_dirs.is_empty() {
            return Err(InspectError::Registry(format!(
                "none of {} application directories is readable",
                self.scan_dirs.len()
            )));
        }

        // handles for bundles that disappeared are not kept past the rescan
        self.icons
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|file, _| index.values().any(|b| file.starts_with(b)));
        *self.index.write().unwrap_or_else(|e| e.into_inner()) = index;
        Ok(res)
    }

    fn bundle_path(&self, package_id: &str) -> Result<PathBuf> {
        let cached = self
            .index
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(package_id)
            .cloned();
        let path = match cached {
            Some(p) => p,
            None => self
                .scan()?
                .into_iter()
                .find(|(id, _)| id == package_id)
                .map(|(_, p)| p)
                .ok_or_else(|| InspectError::NotFound(package_id.to_string()))?,
        };
        if !path.is_dir() {
            return Err(InspectError::NotFound(package_id.to_string()));
        }
        Ok(path)
    }

    /// Bundle path plus its parsed Info.plist, checked to still describe `package_id`.
    fn resolve(&self, package_id: &str) -> Result<(PathBuf, Dictionary)> {
        let path = self.bundle_path(package_id)?;
        let dict = read_info_plist(&path)?;
        if package_id_for(&path, &dict) != package_id {
            return Err(InspectError::NotFound(package_id.to_string()));
        }
        Ok((path, dict))
    }

    fn icon_for(&self, bundle: &Path, dict: &Dictionary) -> Option<Arc<IconHandle>> {
        let name = string_key(dict, "CFBundleIconFile")?;
        let mut file = bundle.join("Contents").join("Resources").join(name);
        if file.extension().is_none() {
            file.set_extension("icns");
        }
        if !file.exists() {
            return None;
        }
        let mut icons = self.icons.lock().unwrap_or_else(|e| e.into_inner());
        Some(
            icons
                .entry(file.clone())
                .or_insert_with(|| IconHandle::new(file))
                .clone(),
        )
    }
}

impl PackageSource for BundleRegistry {
    fn package_ids(&self) -> Result<Vec<String>> {
        Ok(self.scan()?.into_iter().map(|(id, _)| id).collect())
    }

    fn package(&self, package_id: &str) -> Result<AppRecord> {
        let (path, dict) = self.resolve(package_id)?;
        let meta = fs::metadata(&path).map_err(|e| InspectError::from_io(&path, e))?;
        let updated_at = meta.modified().map(epoch_millis).unwrap_or(0);
        let installed_at = meta.created().map(epoch_millis).unwrap_or(updated_at);

        let display_name = string_key(&dict, "CFBundleDisplayName")
            .or_else(|| string_key(&dict, "CFBundleName"))
            .map(str::to_string)
            .unwrap_or_else(|| {
                path.file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| package_id.to_string())
            });
        let file_path = match string_key(&dict, "CFBundleExecutable") {
            Some(exe) => path.join("Contents").join("MacOS").join(exe),
            None => path.clone(),
        };

        Ok(AppRecord {
            display_name,
            package_id: package_id.to_string(),
            version_name: string_key(&dict, "CFBundleShortVersionString")
                .unwrap_or("Unknown")
                .to_string(),
            version_code: string_key(&dict, "CFBundleVersion")
                .map(parse_version_code)
                .unwrap_or(0),
            icon: self.icon_for(&path, &dict),
            is_system_package: self.is_system(&path),
            installed_at,
            updated_at,
            file_path,
        })
    }

    fn permissions(&self, package_id: &str) -> Result<Vec<String>> {
        let (_, dict) = self.resolve(package_id)?;
        Ok(usage_permissions(&dict))
    }

    fn activities(&self, package_id: &str) -> Result<Vec<String>> {
        let (path, _) = self.resolve(package_id)?;
        Ok(nested_bundle_ids(&path))
    }
}

impl Launcher for BundleRegistry {
    fn start(&self, package_id: &str) -> Result<()> {
        let path = self
            .bundle_path(package_id)
            .map_err(|e| InspectError::LaunchFailed(format!("{}: {}", package_id, e)))?;
        if !cfg!(target_os = "macos") {
            return Err(InspectError::LaunchFailed(format!(
                "{}: launching is supported only on macOS",
                package_id
            )));
        }
        let mut cmd = Command::new("open");
        if Path::new(package_id) == path.as_path() {
            cmd.arg(&path);
        } else {
            cmd.arg("-b").arg(package_id);
        }
        let status = cmd
            .status()
            .map_err(|e| InspectError::LaunchFailed(format!("{}: {}", package_id, e)))?;
        if !status.success() {
            return Err(InspectError::LaunchFailed(format!("{}: open exited with {}", package_id, status)));
        }
        Ok(())
    }
}

/// `.app` children of `dir`, sorted by file name.
fn bundles_in_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut res = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| InspectError::from_io(dir, e))? {
        let Ok(e) = entry else { continue };
        let p = e.path();
        if p.extension().and_then(|s| s.to_str()) == Some("app") {
            res.push(p);
        }
    }
    res.sort();
    Ok(res)
}

/// Parse `Contents/Info.plist` of a bundle.
pub fn read_info_plist(bundle: &Path) -> Result<Dictionary> {
    let info = bundle.join("Contents").join("Info.plist");
    let bytes = fs::read(&info).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => InspectError::NotFound(bundle.display().to_string()),
        _ => InspectError::from_io(&info, e),
    })?;
    let value = Value::from_reader(Cursor::new(bytes)).map_err(|e| InspectError::Unreadable {
        path: info.clone(),
        source: io::Error::new(io::ErrorKind::InvalidData, e.to_string()),
    })?;
    value
        .into_dictionary()
        .ok_or_else(|| InspectError::Unreadable {
            path: info,
            source: io::Error::new(io::ErrorKind::InvalidData, "Info.plist is not a dictionary"),
        })
}

fn string_key<'a>(dict: &'a Dictionary, key: &str) -> Option<&'a str> {
    dict.get(key).and_then(|v| v.as_string()).filter(|s| !s.is_empty())
}

/// CFBundleIdentifier, or the bundle path for bundles that lack one.
fn package_id_for(bundle: &Path, dict: &Dictionary) -> String {
    string_key(dict, "CFBundleIdentifier")
        .map(str::to_string)
        .unwrap_or_else(|| bundle.to_string_lossy().to_string())
}

/// Leading integer of a build number such as "1234" or "17.4.1".
pub fn parse_version_code(raw: &str) -> i64 {
    let raw = raw.trim();
    raw.parse::<i64>().unwrap_or_else(|_| {
        raw.split(|c: char| !c.is_ascii_digit())
            .next()
            .and_then(|lead| lead.parse().ok())
            .unwrap_or(0)
    })
}

/// Privacy usage declarations (`NS...UsageDescription`) in plist order.
fn usage_permissions(dict: &Dictionary) -> Vec<String> {
    dict.keys()
        .filter(|k| k.ends_with("UsageDescription"))
        .cloned()
        .collect()
}

/// Identifiers of app extensions, XPC services and helper apps inside a bundle.
fn nested_bundle_ids(bundle: &Path) -> Vec<String> {
    WalkDir::new(bundle.join("Contents"))
        .min_depth(1)
        .max_depth(NESTED_MAX_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|ent| {
            ent.file_type().is_dir()
                && ent
                    .path()
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| NESTED_BUNDLE_EXTS.contains(&ext))
        })
        .filter_map(|ent| {
            let dict = read_info_plist(ent.path()).ok()?;
            string_key(&dict, "CFBundleIdentifier").map(str::to_string)
        })
        .collect()
}

fn epoch_millis(t: SystemTime) -> i64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
