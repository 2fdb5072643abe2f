use crate::core::{
    descriptor::testapp_config, AssetManager, BuildConfig, HashType, ManagerConfig, SharedCatalog,
};
use crate::infrastructure::AssetServer;
use crate::utils::{
    AssetError, AssetTubeUI, CliOverrides, ConfigLoader, Logger, ResolvedConfig, Result,
    CONFIG_FILE_NAME,
};
use clap::{Args, Parser, Subcommand};
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "assettube")]
#[command(about = "assettube - fingerprint, map and serve bundled web assets")]
pub struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a bundler build descriptor as JSON
    Describe {
        /// Project root anchoring the output directory
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
        /// Load and re-emit a descriptor file instead of the built-in test app
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print a summary instead of JSON
        #[arg(long)]
        summary: bool,
    },
    /// Fingerprint asset roots and print the resulting URLs
    Fingerprint {
        /// Asset root directories
        #[arg(short, long = "root", required = true)]
        roots: Vec<PathBuf>,
        #[command(flatten)]
        manager: ManagerArgs,
    },
    /// Serve assets from roots or from a manifest
    Serve {
        /// Asset root directories
        #[arg(short, long = "root")]
        roots: Vec<PathBuf>,
        #[command(flatten)]
        manager: ManagerArgs,
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to serve on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Write an example assettube.json
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show version and feature information
    Info,
}

/// Flags shared by `fingerprint` and `serve`
#[derive(Args, Debug, Clone, Default)]
pub struct ManagerArgs {
    /// Copy matched files under content-hashed names
    #[arg(long, overrides_with = "no_fingerprint")]
    pub fingerprint: bool,
    /// Serve files in place (development mode)
    #[arg(long)]
    pub no_fingerprint: bool,
    /// Emit Subresource Integrity digests
    #[arg(long)]
    pub integrity: bool,
    /// Digest for Subresource Integrity
    #[arg(long, value_enum)]
    pub hash_type: Option<HashType>,
    /// URL prefix for served assets
    #[arg(long)]
    pub prefix: Option<String>,
    /// CDN hostname placed in front of asset URLs
    #[arg(long)]
    pub hostname: Option<String>,
    /// File extensions to fingerprint (repeatable)
    #[arg(long = "ext")]
    pub extensions: Vec<String>,
    /// Manifest to write (fingerprint) or read (serve)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,
    /// Directory holding assettube.json (defaults to the first root)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}

impl ManagerArgs {
    pub fn overrides(&self) -> CliOverrides {
        let fingerprint = if self.fingerprint {
            Some(true)
        } else if self.no_fingerprint {
            Some(false)
        } else {
            None
        };

        CliOverrides {
            fingerprint,
            url_prefix: self.prefix.clone(),
            hostname: self.hostname.clone(),
            subresource_integrity: self.integrity.then_some(true),
            hash_type: self.hash_type,
            extensions: (!self.extensions.is_empty()).then(|| self.extensions.clone()),
            manifest: self.manifest.clone(),
        }
    }

    /// Layer explicit URL and integrity flags over a manifest's settings.
    /// `None` when no such flag was given.
    pub fn manifest_config(&self, base: &ManagerConfig) -> Option<ManagerConfig> {
        if self.prefix.is_none()
            && self.hostname.is_none()
            && !self.integrity
            && self.hash_type.is_none()
        {
            return None;
        }

        let mut config = base.clone();
        if let Some(prefix) = &self.prefix {
            config.url_prefix = prefix.clone();
        }
        if let Some(hostname) = &self.hostname {
            config.hostname = hostname.clone();
        }
        if self.integrity {
            config.subresource_integrity = true;
        }
        if let Some(hash_type) = self.hash_type {
            config.hash_type = hash_type;
        }
        Some(config)
    }

    /// Layer CLI flags over `assettube.json`
    pub fn resolve(&self, roots: &[PathBuf]) -> Result<ResolvedConfig> {
        let config_dir = self
            .config_dir
            .clone()
            .or_else(|| roots.first().cloned())
            .unwrap_or_else(|| PathBuf::from("."));
        let file_config = ConfigLoader::load_from_file(&config_dir)?;
        Ok(ConfigLoader::merge_with_cli(file_config, &config_dir, self.overrides()))
    }
}

pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> Result<()> {
        let cli = Cli::parse();

        Logger::init(cli.verbose);

        match cli.command {
            Commands::Describe { root, config, summary } => {
                self.handle_describe_command(&root, config.as_deref(), summary)
            }
            Commands::Fingerprint { roots, manager } => {
                self.handle_fingerprint_command(&roots, &manager)
            }
            Commands::Serve { roots, manager, host, port } => {
                self.handle_serve_command(&roots, &manager, &host, port).await
            }
            Commands::Init { dir, force } => self.handle_init_command(&dir, force),
            Commands::Info => self.handle_info_command(),
        }
    }

    fn handle_describe_command(&self, root: &Path, config: Option<&Path>, summary: bool) -> Result<()> {
        let descriptor = match config {
            Some(path) => BuildConfig::from_json_file(path)?,
            None => testapp_config(root),
        };

        if summary {
            AssetTubeUI::new().show_entries(&descriptor);
        } else {
            println!("{}", descriptor.to_json_pretty()?);
        }
        Ok(())
    }

    fn handle_fingerprint_command(&self, roots: &[PathBuf], args: &ManagerArgs) -> Result<()> {
        let ui = AssetTubeUI::new();
        ui.show_banner();

        let resolved = args.resolve(roots)?;
        let manager = AssetManager::with_roots(resolved.manager, roots)?;

        ui.show_mappings(&manager);

        if let Some(manifest_path) = resolved.manifest {
            let manifest = manager.manifest();
            manifest.save(&manifest_path)?;
            Logger::manifest_written(&manifest_path, manifest.len());
        }
        Ok(())
    }

    async fn handle_serve_command(
        &self,
        roots: &[PathBuf],
        args: &ManagerArgs,
        host: &str,
        port: u16,
    ) -> Result<()> {
        let resolved = args.resolve(roots)?;

        let manager = if roots.is_empty() {
            let manifest_path = resolved.manifest.as_deref().ok_or_else(|| {
                AssetError::config("serve needs at least one --root or a --manifest")
            })?;
            let mut manager = AssetManager::from_manifest(manifest_path)?;
            if let Some(config) = args.manifest_config(manager.config()) {
                manager.set_config(config)?;
            }
            manager
        } else {
            AssetManager::with_roots(resolved.manager, roots)?
        };

        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| AssetError::config(format!("Invalid address {}:{}: {}", host, port, e)))?;

        let prefix = manager.config().url_prefix.clone();
        let catalog: SharedCatalog = Arc::new(RwLock::new(manager));

        AssetServer::new(catalog)
            .with_display_prefix(&prefix)
            .run(addr)
            .await
    }

    fn handle_init_command(&self, dir: &Path, force: bool) -> Result<()> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() && !force {
            return Err(AssetError::config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }

        std::fs::create_dir_all(dir).map_err(|e| AssetError::io_at(dir, e))?;
        std::fs::write(&path, ConfigLoader::generate_example() + "\n")
            .map_err(|e| AssetError::io_at(&path, e))?;
        Logger::info(&format!("✅ Wrote {}", path.display()));
        Ok(())
    }

    fn handle_info_command(&self) -> Result<()> {
        Logger::info(&format!("🦀 assettube v{}", env!("CARGO_PKG_VERSION")));
        Logger::info("══════════════════════════════════════");
        Logger::info("");
        Logger::info("🎯 Features:");
        Logger::info("  • Bundler build descriptors (entries, hashed output, plugin pipeline)");
        Logger::info("  • Content fingerprinting into <root>/assettube");
        Logger::info("  • Subresource Integrity (sha256, sha384, sha512)");
        Logger::info("  • JSON manifests, written and served");
        Logger::info("  • Asset server with immutable caching for fingerprinted files");
        Ok(())
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}
