use crate::core::plugin::PluginPipeline;
use crate::utils::{AssetError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

static TEMPLATE_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([a-z]+)(?::(\d+))?\]").expect("template token regex is valid")
});

/// Declarative description of a bundler invocation.
///
/// Read once by the external bundler; nothing here checks that entries
/// exist or that paths are well formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Logical bundle name -> source module path
    #[serde(rename = "entry")]
    pub entries: BTreeMap<String, String>,
    pub output: OutputConfig,
    #[serde(rename = "cache", default)]
    pub cache_enabled: bool,
    #[serde(default)]
    pub plugins: PluginPipeline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    /// Directory the bundler writes into
    pub path: PathBuf,
    /// File name template, e.g. `[name].[chunkhash].js`
    pub filename: String,
    /// Base for asset URLs emitted into bundles
    #[serde(default)]
    pub public_path: String,
}

impl BuildConfig {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AssetError::io_at(path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            AssetError::config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn entry(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl OutputConfig {
    /// Bracketed tokens in the filename template, in order of appearance
    pub fn placeholders(&self) -> Vec<&str> {
        TEMPLATE_TOKEN_REGEX
            .find_iter(&self.filename)
            .map(|m| m.as_str())
            .collect()
    }

    /// Expand `[name]`, `[chunkhash]` and `[hash]` (optionally `:N` truncated).
    /// Unknown tokens are left untouched.
    pub fn render_filename(&self, name: &str, hash: &str) -> String {
        TEMPLATE_TOKEN_REGEX
            .replace_all(&self.filename, |caps: &Captures| {
                let token = &caps[1];
                match token {
                    "name" => name.to_string(),
                    "chunkhash" | "hash" => match caps
                        .get(2)
                        .and_then(|m| m.as_str().parse::<usize>().ok())
                    {
                        Some(len) => hash.chars().take(len).collect(),
                        None => hash.to_string(),
                    },
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Join the public path and an emitted file name with a single `/`
    pub fn public_url(&self, filename: &str) -> String {
        let base = self.public_path.trim_end_matches('/');
        let file = filename.trim_start_matches('/');
        if base.is_empty() {
            file.to_string()
        } else {
            format!("{}/{}", base, file)
        }
    }
}
