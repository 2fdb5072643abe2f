use crate::core::manager::AssetManager;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;

/// Lookup interface the asset server depends on
pub trait AssetCatalog: Send + Sync {
    /// File to serve for a request path, if any
    fn resolve_url(&self, url_path: &str) -> Option<PathBuf>;
    /// Whether served names carry content hashes (and can be cached forever)
    fn is_fingerprinted(&self) -> bool;
}

pub type SharedCatalog = Arc<dyn AssetCatalog>;

impl AssetCatalog for AssetManager {
    fn resolve_url(&self, url_path: &str) -> Option<PathBuf> {
        AssetManager::resolve_url(self, url_path)
    }

    fn is_fingerprinted(&self) -> bool {
        AssetManager::is_fingerprinted(self)
    }
}

impl AssetCatalog for RwLock<AssetManager> {
    fn resolve_url(&self, url_path: &str) -> Option<PathBuf> {
        self.read().resolve_url(url_path)
    }

    fn is_fingerprinted(&self) -> bool {
        self.read().is_fingerprinted()
    }
}
