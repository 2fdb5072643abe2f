// Plugin pipeline for build descriptors
// Plugins are configuration records; the bundler that reads them owns their behavior.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One stage of the bundler's plugin pipeline, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PluginDescriptor {
    /// Drop duplicate modules
    Dedupe,
    /// Compile-time constant replacement. Values are source-code literals.
    Define { definitions: BTreeMap<String, String> },
    /// Minify emitted chunks
    UglifyJs,
    /// Assign module ids by occurrence count
    OccurrenceOrder,
    /// Merge chunks aggressively
    AggressiveMerging,
    /// Keep emitting even when compilation reports errors
    NoErrors,
    /// Bind free identifiers to modules
    Provide { bindings: BTreeMap<String, String> },
    /// Emit a logical name -> hashed file mapping
    Manifest(ManifestOptions),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestOptions {
    /// Prefix for manifest keys. Unset means the manifest plugin's own default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    Dedupe,
    Define,
    UglifyJs,
    OccurrenceOrder,
    AggressiveMerging,
    NoErrors,
    Provide,
    Manifest,
}

impl PluginKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginKind::Dedupe => "dedupe",
            PluginKind::Define => "define",
            PluginKind::UglifyJs => "uglify-js",
            PluginKind::OccurrenceOrder => "occurrence-order",
            PluginKind::AggressiveMerging => "aggressive-merging",
            PluginKind::NoErrors => "no-errors",
            PluginKind::Provide => "provide",
            PluginKind::Manifest => "manifest",
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PluginDescriptor {
    pub fn kind(&self) -> PluginKind {
        match self {
            PluginDescriptor::Dedupe => PluginKind::Dedupe,
            PluginDescriptor::Define { .. } => PluginKind::Define,
            PluginDescriptor::UglifyJs => PluginKind::UglifyJs,
            PluginDescriptor::OccurrenceOrder => PluginKind::OccurrenceOrder,
            PluginDescriptor::AggressiveMerging => PluginKind::AggressiveMerging,
            PluginDescriptor::NoErrors => PluginKind::NoErrors,
            PluginDescriptor::Provide { .. } => PluginKind::Provide,
            PluginDescriptor::Manifest(_) => PluginKind::Manifest,
        }
    }

    pub fn define<I, K, V>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        PluginDescriptor::Define {
            definitions: definitions
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn provide<I, K, V>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        PluginDescriptor::Provide {
            bindings: bindings
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Ordered plugin list. Later stages see the output of earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginPipeline(Vec<PluginDescriptor>);

impl PluginPipeline {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, plugin: PluginDescriptor) {
        self.0.push(plugin);
    }

    pub fn with(mut self, plugin: PluginDescriptor) -> Self {
        self.push(plugin);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PluginDescriptor> {
        self.0.iter()
    }

    pub fn kinds(&self) -> Vec<PluginKind> {
        self.0.iter().map(PluginDescriptor::kind).collect()
    }

    /// Index of the first stage of the given kind
    pub fn position(&self, kind: PluginKind) -> Option<usize> {
        self.0.iter().position(|p| p.kind() == kind)
    }

    pub fn manifest_options(&self) -> Option<&ManifestOptions> {
        self.0.iter().find_map(|p| match p {
            PluginDescriptor::Manifest(options) => Some(options),
            _ => None,
        })
    }
}

impl From<Vec<PluginDescriptor>> for PluginPipeline {
    fn from(plugins: Vec<PluginDescriptor>) -> Self {
        Self(plugins)
    }
}

impl<'a> IntoIterator for &'a PluginPipeline {
    type Item = &'a PluginDescriptor;
    type IntoIter = std::slice::Iter<'a, PluginDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
