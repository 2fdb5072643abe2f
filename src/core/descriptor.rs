use crate::core::models::{BuildConfig, OutputConfig};
use crate::core::plugin::{ManifestOptions, PluginDescriptor, PluginPipeline};
use std::collections::BTreeMap;
use std::path::Path;

pub const OUTPUT_DIR: &str = "output";
pub const OUTPUT_FILENAME: &str = "[name].[chunkhash].js";
pub const PUBLIC_PATH: &str = "./public";
pub const FETCH_POLYFILL: &str = "imports?this=>global!exports?global.fetch!whatwg-fetch";

/// Build descriptor for the manifest test app rooted at `root`.
///
/// Three entries, hashed output names and a production plugin pipeline that
/// ends with the manifest emitter, so the manifest sees merged, minified output.
pub fn testapp_config(root: &Path) -> BuildConfig {
    let entries = BTreeMap::from([
        ("app".to_string(), "./index.js".to_string()),
        ("app2".to_string(), "./index2.js".to_string()),
        ("app3".to_string(), "./src/app3.js".to_string()),
    ]);

    let plugins = PluginPipeline::new()
        .with(PluginDescriptor::Dedupe)
        .with(PluginDescriptor::define([("process.env.NODE_ENV", "\"production\"")]))
        .with(PluginDescriptor::UglifyJs)
        .with(PluginDescriptor::OccurrenceOrder)
        .with(PluginDescriptor::AggressiveMerging)
        .with(PluginDescriptor::NoErrors)
        .with(PluginDescriptor::provide([("fetch", FETCH_POLYFILL)]))
        // basePath deliberately unset
        .with(PluginDescriptor::Manifest(ManifestOptions::default()));

    BuildConfig {
        entries,
        output: OutputConfig {
            path: root.join(OUTPUT_DIR),
            filename: OUTPUT_FILENAME.to_string(),
            public_path: PUBLIC_PATH.to_string(),
        },
        cache_enabled: false,
        plugins,
    }
}
