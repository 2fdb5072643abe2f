// Process-wide default manager, for template helpers that cannot carry state

use crate::core::interfaces::{AssetCatalog, SharedCatalog};
use crate::core::manager::{AssetManager, ManagerConfig};
use crate::utils::Result;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static DEFAULT_MANAGER: Lazy<RwLock<AssetManager>> =
    Lazy::new(|| RwLock::new(AssetManager::new(ManagerConfig::default())));

pub fn add(root: impl AsRef<Path>) -> Result<()> {
    DEFAULT_MANAGER.write().add(root)
}

pub fn set_config(config: ManagerConfig) -> Result<()> {
    DEFAULT_MANAGER.write().set_config(config)
}

pub fn asset_path(name: &str) -> Option<String> {
    DEFAULT_MANAGER.read().asset_path(name)
}

pub fn integrity(name: &str) -> Option<String> {
    DEFAULT_MANAGER.read().integrity(name)
}

pub fn script(name: &str, attrs: &[(&str, &str)]) -> Option<String> {
    DEFAULT_MANAGER.read().script(name, attrs)
}

pub fn link(name: &str, attrs: &[(&str, &str)]) -> Option<String> {
    DEFAULT_MANAGER.read().link(name, attrs)
}

/// Handle to the default manager for the asset server
pub fn catalog() -> SharedCatalog {
    Arc::new(DefaultCatalog)
}

struct DefaultCatalog;

impl AssetCatalog for DefaultCatalog {
    fn resolve_url(&self, url_path: &str) -> Option<PathBuf> {
        DEFAULT_MANAGER.read().resolve_url(url_path)
    }

    fn is_fingerprinted(&self) -> bool {
        DEFAULT_MANAGER.read().is_fingerprinted()
    }
}
