use crate::core::integrity::HashType;
use crate::utils::{AssetError, Logger, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Name of the per-root directory holding fingerprinted copies
pub const CACHE_DIR_NAME: &str = "assettube";

/// Hex characters of the content hash kept in served file names
pub const FINGERPRINT_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    /// Root-relative name with `/` separators
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct AssetWalk {
    /// Root-relative directories, parents before children
    pub dirs: Vec<String>,
    pub files: Vec<AssetFile>,
}

#[derive(Debug, Clone)]
pub struct FingerprintedAsset {
    pub name: String,
    pub served_name: String,
    pub cache_path: PathBuf,
    pub integrity: Option<String>,
}

/// Walk `root`, skipping the top-level cache directory
pub fn walk_root(root: &Path) -> Result<AssetWalk> {
    let mut walk = AssetWalk::default();

    let entries = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.depth() == 1
                && entry.file_type().is_dir()
                && entry.file_name() == CACHE_DIR_NAME)
        });

    for entry in entries {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| AssetError::config(format!(
                "{} is outside asset root {}",
                entry.path().display(),
                root.display()
            )))?;
        let name = logical_name(relative);

        if entry.file_type().is_dir() {
            walk.dirs.push(name);
        } else {
            walk.files.push(AssetFile {
                name,
                path: entry.path().to_path_buf(),
            });
        }
    }

    Ok(walk)
}

/// Join path components with `/` regardless of platform
pub fn logical_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Remove and recreate `<root>/assettube`
pub fn reset_cache_dir(root: &Path) -> Result<PathBuf> {
    let cache_dir = root.join(CACHE_DIR_NAME);
    if cache_dir.exists() {
        Logger::resetting_cache_dir(&cache_dir);
        fs::remove_dir_all(&cache_dir).map_err(|e| AssetError::io_at(&cache_dir, e))?;
    }
    fs::create_dir_all(&cache_dir).map_err(|e| AssetError::io_at(&cache_dir, e))?;
    Ok(cache_dir)
}

pub fn mirror_dirs(cache_dir: &Path, dirs: &[String]) -> Result<()> {
    for dir in dirs {
        let target = cache_dir.join(dir);
        fs::create_dir_all(&target).map_err(|e| AssetError::io_at(&target, e))?;
    }
    Ok(())
}

pub fn content_fingerprint(content: &[u8]) -> String {
    let hex = blake3::hash(content).to_hex();
    hex.as_str()[..FINGERPRINT_LEN].to_string()
}

/// `js/app.min.js` + `abc` -> `js/app.min.abc.js`
pub fn fingerprinted_name(name: &str, fingerprint: &str) -> String {
    let base_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
    match name[base_start..].rfind('.') {
        Some(dot) => {
            let (stem, ext) = name.split_at(base_start + dot);
            format!("{}.{}{}", stem, fingerprint, ext)
        }
        None => format!("{}.{}", name, fingerprint),
    }
}

/// Hash one file and copy it into the cache directory under its fingerprinted name
pub fn fingerprint_asset(
    file: &AssetFile,
    cache_dir: &Path,
    integrity: Option<HashType>,
) -> Result<FingerprintedAsset> {
    let content = fs::read(&file.path).map_err(|e| AssetError::io_at(&file.path, e))?;

    let served_name = fingerprinted_name(&file.name, &content_fingerprint(&content));
    let cache_path = cache_dir.join(&served_name);

    // fs::copy keeps the source permissions
    fs::copy(&file.path, &cache_path).map_err(|e| AssetError::io_at(&cache_path, e))?;

    Ok(FingerprintedAsset {
        name: file.name.clone(),
        served_name,
        cache_path,
        integrity: integrity.map(|hash| hash.encoded_digest(&content)),
    })
}
