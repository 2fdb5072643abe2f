use assettube::core::descriptor::{testapp_config, FETCH_POLYFILL};
use assettube::core::plugin::{PluginDescriptor, PluginKind};
use assettube::BuildConfig;
use std::path::{Path, PathBuf};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/testapp/assettube.build.json")
}

#[test]
fn test_fixture_matches_builtin_descriptor() {
    let loaded = BuildConfig::from_json_file(&fixture_path()).unwrap();

    // The fixture stores the output directory relative to the project
    assert_eq!(loaded, testapp_config(Path::new("")));
}

#[test]
fn test_every_entry_source_exists() {
    let root = fixture_path().parent().unwrap().to_path_buf();
    let config = testapp_config(&root);

    for name in config.entry_names() {
        let source = config.entry(name).unwrap();
        assert!(root.join(source).is_file(), "missing source for {}", name);
    }
}

#[test]
fn test_output_names_are_hashed_per_entry() {
    let config = testapp_config(Path::new("/srv/testapp"));

    let names: Vec<String> = config
        .entry_names()
        .map(|name| config.output.render_filename(name, "8f3a9c"))
        .collect();
    assert_eq!(names, vec!["app.8f3a9c.js", "app2.8f3a9c.js", "app3.8f3a9c.js"]);
    assert_eq!(
        config.output.public_url(&names[0]),
        "./public/app.8f3a9c.js"
    );
}

#[test]
fn test_manifest_plugin_runs_after_minification() {
    let config = testapp_config(Path::new("."));
    let plugins = &config.plugins;

    let manifest = plugins.position(PluginKind::Manifest).unwrap();
    assert_eq!(manifest, plugins.len() - 1);
    assert!(plugins.position(PluginKind::UglifyJs).unwrap() < manifest);
    assert!(plugins.position(PluginKind::AggressiveMerging).unwrap() < manifest);
    assert_eq!(plugins.manifest_options().unwrap().base_path, None);
}

#[test]
fn test_define_and_provide_values() {
    let config = testapp_config(Path::new("."));

    let mut saw_define = false;
    let mut saw_provide = false;
    for plugin in &config.plugins {
        match plugin {
            PluginDescriptor::Define { definitions } => {
                saw_define = true;
                assert_eq!(
                    definitions.get("process.env.NODE_ENV").map(String::as_str),
                    Some("\"production\"")
                );
            }
            PluginDescriptor::Provide { bindings } => {
                saw_provide = true;
                assert_eq!(bindings.get("fetch").map(String::as_str), Some(FETCH_POLYFILL));
            }
            _ => {}
        }
    }
    assert!(saw_define && saw_provide);
}

#[test]
fn test_descriptor_json_round_trip() {
    let config = testapp_config(Path::new("/srv/testapp"));
    let json = config.to_json_pretty().unwrap();

    assert!(json.contains("\"entry\""));
    assert!(json.contains("\"publicPath\": \"./public\""));
    assert!(json.contains("\"kind\": \"uglify-js\""));
    assert!(!json.contains("basePath"));

    let parsed = BuildConfig::from_json_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_unknown_plugin_kind_is_rejected() {
    let err = BuildConfig::from_json_str(
        r#"{"entry": {}, "output": {"path": "out", "filename": "[name].js"},
            "plugins": [{"kind": "hot-module-replacement"}]}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("hot-module-replacement"));
}
