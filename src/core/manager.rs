// Asset manager: fingerprints asset roots and maps logical names to served URLs

use crate::core::html;
use crate::core::integrity::HashType;
use crate::core::manifest::Manifest;
use crate::infrastructure::file_system::{self, FingerprintedAsset};
use crate::utils::{AssetError, Logger, Result, Timer};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Decides which files get fingerprinted and served
#[derive(Clone)]
pub enum Matcher {
    /// Case-insensitive extension list, without dots
    Extensions(Vec<String>),
    Custom(Arc<dyn Fn(&Path) -> bool + Send + Sync>),
}

impl Matcher {
    pub fn extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Matcher::Extensions(
            extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        )
    }

    pub fn custom(predicate: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        Matcher::Custom(Arc::new(predicate))
    }

    pub fn matches(&self, path: &Path) -> bool {
        match self {
            Matcher::Extensions(extensions) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| {
                    let ext = ext.to_ascii_lowercase();
                    extensions.iter().any(|candidate| *candidate == ext)
                })
                .unwrap_or(false),
            Matcher::Custom(predicate) => predicate(path),
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Matcher::extensions(["js", "css"])
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Extensions(extensions) => {
                f.debug_tuple("Extensions").field(extensions).finish()
            }
            Matcher::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ManagerConfig {
    /// Copy matched files under content-hashed names. Off means development mode.
    pub fingerprint: bool,
    /// Path segment prepended to served URLs
    pub url_prefix: String,
    /// CDN host, e.g. `https://cdn.example.com`
    pub hostname: String,
    pub matcher: Matcher,
    pub subresource_integrity: bool,
    pub hash_type: HashType,
}

impl ManagerConfig {
    pub fn with_fingerprint(mut self, fingerprint: bool) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_integrity(mut self, hash_type: HashType) -> Self {
        self.subresource_integrity = true;
        self.hash_type = hash_type;
        self
    }

    fn normalized(mut self) -> Self {
        self.url_prefix = self.url_prefix.trim_matches('/').to_string();
        self.hostname = self.hostname.trim_end_matches('/').to_string();
        self
    }
}

pub struct AssetManager {
    config: ManagerConfig,
    roots: Vec<PathBuf>,
    /// logical name -> served name
    paths: HashMap<String, String>,
    /// served name -> file on disk
    files: HashMap<String, PathBuf>,
    /// logical name -> encoded digest
    integrities: HashMap<String, String>,
    /// root -> (logical name, served name) pairs it contributed
    root_assets: HashMap<PathBuf, Vec<(String, String)>>,
    manifest_backed: bool,
}

impl AssetManager {
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            config: config.normalized(),
            roots: Vec::new(),
            paths: HashMap::new(),
            files: HashMap::new(),
            integrities: HashMap::new(),
            root_assets: HashMap::new(),
            manifest_backed: false,
        }
    }

    pub fn with_roots<I, P>(config: ManagerConfig, roots: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut manager = Self::new(config);
        for root in roots {
            manager.add(root)?;
        }
        Ok(manager)
    }

    /// Build a manager from a manifest written by `manifest()` or an external tool
    pub fn from_manifest(path: &Path) -> Result<Self> {
        let manifest = Manifest::load(path)?;
        Logger::manifest_loaded(path, manifest.len());
        Ok(Self::from_manifest_data(manifest))
    }

    pub fn from_manifest_data(manifest: Manifest) -> Self {
        let config = ManagerConfig {
            fingerprint: true,
            url_prefix: manifest.url_prefix.clone(),
            hostname: manifest.hostname.clone(),
            subresource_integrity: manifest.hash_type.is_some() || !manifest.integrities.is_empty(),
            hash_type: manifest.hash_type.unwrap_or_default(),
            ..Default::default()
        };

        let mut manager = Self::new(config);
        manager.manifest_backed = true;
        for (name, served) in &manifest.paths {
            manager.files.insert(served.clone(), manifest.file_for(served));
            manager.paths.insert(name.clone(), served.clone());
        }
        for (served, file) in &manifest.files {
            manager
                .files
                .entry(served.clone())
                .or_insert_with(|| file.clone());
        }
        manager.integrities = manifest.integrities.into_iter().collect();
        manager
    }

    /// Include `root` in the serving scope.
    ///
    /// In fingerprint mode `<root>/assettube` is wiped and refilled with
    /// hashed copies of every matched file. Adding a root again replaces
    /// everything it contributed before.
    pub fn add(&mut self, root: impl AsRef<Path>) -> Result<()> {
        let root = root.as_ref();
        let timer = Timer::start(&format!("indexing {}", root.display()));
        Logger::scanning_root(root, self.config.fingerprint);

        let walk = file_system::walk_root(root)?;

        let mut contributed = Vec::new();
        let count = if self.config.fingerprint {
            let cache_dir = file_system::reset_cache_dir(root)?;
            file_system::mirror_dirs(&cache_dir, &walk.dirs)?;

            let (matched, skipped): (Vec<_>, Vec<_>) = walk
                .files
                .into_iter()
                .partition(|file| self.config.matcher.matches(&file.path));
            for file in &skipped {
                Logger::skipped(&file.name);
            }

            let integrity = self
                .config
                .subresource_integrity
                .then_some(self.config.hash_type);
            let assets = matched
                .par_iter()
                .map(|file| file_system::fingerprint_asset(file, &cache_dir, integrity))
                .collect::<Result<Vec<FingerprintedAsset>>>()?;

            self.forget_root(root);
            let count = assets.len();
            for asset in assets {
                Logger::fingerprinted(&asset.name, &asset.served_name);
                if let Some(digest) = asset.integrity {
                    self.integrities.insert(asset.name.clone(), digest);
                }
                self.files.insert(asset.served_name.clone(), asset.cache_path);
                self.paths.insert(asset.name.clone(), asset.served_name.clone());
                contributed.push((asset.name, asset.served_name));
            }
            count
        } else {
            self.forget_root(root);
            let count = walk.files.len();
            for file in walk.files {
                self.files.insert(file.name.clone(), file.path);
                self.paths.insert(file.name.clone(), file.name.clone());
                contributed.push((file.name.clone(), file.name));
            }
            count
        };

        if !self.roots.iter().any(|known| known == root) {
            self.roots.push(root.to_path_buf());
        }
        self.root_assets.insert(root.to_path_buf(), contributed);
        Logger::root_complete(root, count, timer.elapsed());
        Ok(())
    }

    /// Drop the entries `root` contributed on an earlier `add`. Entries whose
    /// file has since been claimed by another root are left alone.
    fn forget_root(&mut self, root: &Path) {
        let Some(previous) = self.root_assets.remove(root) else {
            return;
        };
        for (name, served) in previous {
            let owned = self
                .files
                .get(&served)
                .is_some_and(|file| file.starts_with(root));
            if !owned {
                continue;
            }
            self.files.remove(&served);
            if self.paths.get(&name) == Some(&served) {
                self.paths.remove(&name);
                self.integrities.remove(&name);
            }
        }
    }

    /// Rebuild every root under a new configuration. The current state is
    /// kept if rebuilding fails.
    pub fn set_config(&mut self, config: ManagerConfig) -> Result<()> {
        if self.manifest_backed {
            return self.reconfigure_manifest(config);
        }
        let rebuilt = Self::with_roots(config, self.roots.clone())?;
        *self = rebuilt;
        Ok(())
    }

    fn reconfigure_manifest(&mut self, config: ManagerConfig) -> Result<()> {
        let config = ManagerConfig {
            fingerprint: true,
            ..config
        }
        .normalized();

        let integrities = if !config.subresource_integrity {
            HashMap::new()
        } else if self.config.subresource_integrity
            && self.config.hash_type == config.hash_type
            && !self.integrities.is_empty()
        {
            self.integrities.clone()
        } else {
            self.paths
                .par_iter()
                .map(|(name, served)| -> Result<(String, String)> {
                    let file = self
                        .files
                        .get(served)
                        .cloned()
                        .unwrap_or_else(|| PathBuf::from(served));
                    let content = std::fs::read(&file).map_err(|e| AssetError::io_at(&file, e))?;
                    Ok((name.clone(), config.hash_type.encoded_digest(&content)))
                })
                .collect::<Result<HashMap<_, _>>>()?
        };

        self.integrities = integrities;
        self.config = config;
        Ok(())
    }

    /// URL for a logical asset name, with hostname and prefix applied
    pub fn asset_path(&self, name: &str) -> Option<String> {
        let served = self.paths.get(name)?;

        let mut parts: Vec<&str> = Vec::with_capacity(3);
        if !self.config.hostname.is_empty() {
            parts.push(&self.config.hostname);
        }
        if !self.config.url_prefix.is_empty() {
            parts.push(&self.config.url_prefix);
        }
        parts.push(served);

        if self.config.hostname.is_empty() {
            Some(format!("/{}", parts.join("/")))
        } else {
            Some(parts.join("/"))
        }
    }

    /// SRI value such as `sha384-...`
    pub fn integrity(&self, name: &str) -> Option<String> {
        self.integrities
            .get(name)
            .filter(|digest| !digest.is_empty())
            .map(|digest| self.config.hash_type.integrity_value(digest))
    }

    /// Map a request path to the file that should be served
    pub fn resolve_url(&self, url_path: &str) -> Option<PathBuf> {
        let mut path = url_path;
        if !self.config.url_prefix.is_empty() {
            if let Some(rest) = path
                .strip_prefix('/')
                .and_then(|p| p.strip_prefix(self.config.url_prefix.as_str()))
            {
                if rest.is_empty() || rest.starts_with('/') {
                    path = rest;
                }
            }
        }
        let path = path.trim_start_matches('/');
        self.files.get(path).cloned()
    }

    pub fn script(&self, name: &str, attrs: &[(&str, &str)]) -> Option<String> {
        let src = self.asset_path(name)?;
        let integrity = self.integrity_attr(name);
        Some(html::script_tag(&src, attrs, integrity.as_deref()))
    }

    pub fn link(&self, name: &str, attrs: &[(&str, &str)]) -> Option<String> {
        let href = self.asset_path(name)?;
        let integrity = self.integrity_attr(name);
        Some(html::link_tag(&href, attrs, integrity.as_deref()))
    }

    fn integrity_attr(&self, name: &str) -> Option<String> {
        self.config
            .subresource_integrity
            .then(|| self.integrity(name).unwrap_or_default())
    }

    /// Export the current mapping
    pub fn manifest(&self) -> Manifest {
        Manifest {
            paths: self
                .paths
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            hostname: self.config.hostname.clone(),
            url_prefix: self.config.url_prefix.clone(),
            files: self
                .files
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            integrities: self
                .integrities
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            hash_type: self
                .config
                .subresource_integrity
                .then_some(self.config.hash_type),
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn is_fingerprinted(&self) -> bool {
        self.config.fingerprint
    }

    /// Logical names, sorted
    pub fn asset_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.paths.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn served_name(&self, name: &str) -> Option<&str> {
        self.paths.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl fmt::Debug for AssetManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetManager")
            .field("config", &self.config)
            .field("roots", &self.roots)
            .field("assets", &self.paths.len())
            .field("manifest_backed", &self.manifest_backed)
            .finish()
    }
}
