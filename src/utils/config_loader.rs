use crate::core::integrity::HashType;
use crate::core::manager::{ManagerConfig, Matcher};
use crate::utils::{AssetError, Logger, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "assettube.json";

/// Configuration file format (assettube.json)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTubeConfig {
    /// Fingerprint matched files (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<bool>,

    /// Path segment in front of every asset URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_prefix: Option<String>,

    /// CDN hostname (default: none)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Emit Subresource Integrity digests (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subresource_integrity: Option<bool>,

    /// SRI digest (default: sha384)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_type: Option<HashType>,

    /// Extensions to fingerprint (default: ["js", "css"])
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,

    /// Manifest to write after fingerprinting or to serve from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
}

/// Command-line values; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub fingerprint: Option<bool>,
    pub url_prefix: Option<String>,
    pub hostname: Option<String>,
    pub subresource_integrity: Option<bool>,
    pub hash_type: Option<HashType>,
    pub extensions: Option<Vec<String>>,
    pub manifest: Option<PathBuf>,
}

/// Effective settings after layering CLI over file over defaults
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub manager: ManagerConfig,
    pub manifest: Option<PathBuf>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `assettube.json` from `root` if it exists
    pub fn load_from_file(root: &Path) -> Result<Option<AssetTubeConfig>> {
        let config_path = root.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            Logger::debug(&format!("No {} found, using defaults", CONFIG_FILE_NAME));
            return Ok(None);
        }

        Logger::debug(&format!("Loading config from {}", config_path.display()));

        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| AssetError::io_at(&config_path, e))?;

        let config: AssetTubeConfig = serde_json::from_str(&content).map_err(|e| {
            AssetError::config(format!("Failed to parse {}: {}", config_path.display(), e))
        })?;

        Logger::debug("✅ Config file loaded successfully");
        Ok(Some(config))
    }

    /// CLI takes precedence over the file, the file over defaults.
    /// A relative manifest path from the file is resolved against `root`.
    pub fn merge_with_cli(
        file_config: Option<AssetTubeConfig>,
        root: &Path,
        cli: CliOverrides,
    ) -> ResolvedConfig {
        let base = file_config.unwrap_or_default();

        let matcher = cli
            .extensions
            .or(base.extensions)
            .map(Matcher::extensions)
            .unwrap_or_default();

        let manager = ManagerConfig {
            fingerprint: cli.fingerprint.or(base.fingerprint).unwrap_or(false),
            url_prefix: cli.url_prefix.or(base.url_prefix).unwrap_or_default(),
            hostname: cli.hostname.or(base.hostname).unwrap_or_default(),
            matcher,
            subresource_integrity: cli
                .subresource_integrity
                .or(base.subresource_integrity)
                .unwrap_or(false),
            hash_type: cli.hash_type.or(base.hash_type).unwrap_or_default(),
        };

        let manifest = cli.manifest.or_else(|| {
            base.manifest.map(|path| {
                if path.is_absolute() {
                    path
                } else {
                    root.join(path)
                }
            })
        });

        ResolvedConfig { manager, manifest }
    }

    /// Example file for `assettube.json`
    pub fn generate_example() -> String {
        let example = AssetTubeConfig {
            fingerprint: Some(true),
            url_prefix: Some("assets".to_string()),
            hostname: None,
            subresource_integrity: Some(true),
            hash_type: Some(HashType::Sha384),
            extensions: Some(vec!["js".to_string(), "css".to_string()]),
            manifest: Some(PathBuf::from("assettube-manifest.json")),
        };
        serde_json::to_string_pretty(&example).unwrap_or_else(|_| {
            r#"{
  "fingerprint": true,
  "urlPrefix": "assets",
  "subresourceIntegrity": true,
  "hashType": "sha384",
  "extensions": ["js", "css"],
  "manifest": "assettube-manifest.json"
}"#
            .to_string()
        })
    }
}
