use tracing::{info, warn, error, debug};
use tracing_subscriber::EnvFilter;
use std::path::Path;
use std::time::Instant;

pub struct Logger;

impl Logger {
    pub fn init(verbose: bool) {
        let default_level = if verbose { "assettube=debug" } else { "assettube=info" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        // A second init (tests, embedding) keeps the first subscriber
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }

    pub fn scanning_root(root: &Path, fingerprint: bool) {
        let mode = if fingerprint { "fingerprint" } else { "development" };
        info!("📁 Scanning assets in {} ({} mode)", root.display(), mode);
    }

    pub fn resetting_cache_dir(dir: &Path) {
        debug!("🧹 Resetting cache directory: {}", dir.display());
    }

    pub fn fingerprinted(name: &str, served: &str) {
        debug!("🔖 {} -> {}", name, served);
    }

    pub fn skipped(name: &str) {
        debug!("⏭️  Skipping unmatched file: {}", name);
    }

    pub fn root_complete(root: &Path, assets: usize, elapsed: std::time::Duration) {
        info!("✅ {} assets ready from {} in {:.2?}", assets, root.display(), elapsed);
    }

    pub fn manifest_loaded(path: &Path, assets: usize) {
        info!("📜 Loaded manifest {} ({} assets)", path.display(), assets);
    }

    pub fn manifest_written(path: &Path, assets: usize) {
        info!("📜 Wrote manifest {} ({} assets)", path.display(), assets);
    }

    pub fn serving(addr: &str, prefix: &str) {
        info!("🌐 Serving assets on http://{}/{}", addr, prefix);
    }

    pub fn info(msg: &str) {
        info!("{}", msg);
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }

    pub fn error(msg: &str) {
        error!("❌ {}", msg);
    }

    pub fn warn(msg: &str) {
        warn!("⚠️  {}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
