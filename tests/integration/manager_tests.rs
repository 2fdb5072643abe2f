use assettube::infrastructure::file_system::{content_fingerprint, CACHE_DIR_NAME};
use assettube::{AssetManager, HashType, ManagerConfig, Manifest, Matcher};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const JS_CONTENT: &[u8] = b"var code = 'test';\n";

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/assets")
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

/// Fingerprinting writes into the root, so every test gets its own copy
fn asset_root() -> TempDir {
    let temp = tempdir().unwrap();
    copy_dir(&fixtures_dir(), temp.path());
    temp
}

fn hashed_js() -> String {
    format!("js/file.{}.js", content_fingerprint(JS_CONTENT))
}

#[test]
fn test_fingerprinted_asset_path() {
    let temp = asset_root();
    let manager =
        AssetManager::with_roots(ManagerConfig::default().with_fingerprint(true), [temp.path()])
            .unwrap();

    assert_eq!(manager.asset_path("js/file.js"), Some(format!("/{}", hashed_js())));
    assert!(temp.path().join(CACHE_DIR_NAME).join(hashed_js()).is_file());
    assert_eq!(manager.roots(), &[temp.path().to_path_buf()]);
}

#[test]
fn test_development_asset_path() {
    let temp = asset_root();
    let manager = AssetManager::with_roots(ManagerConfig::default(), [temp.path()]).unwrap();

    assert_eq!(manager.asset_path("js/file.js").as_deref(), Some("/js/file.js"));
    assert_eq!(manager.asset_path("css/file.css").as_deref(), Some("/css/file.css"));
    assert_eq!(manager.asset_path("img/logo.svg").as_deref(), Some("/img/logo.svg"));
}

#[test]
fn test_hostname_and_prefix() {
    let temp = asset_root();
    let config = ManagerConfig::default()
        .with_fingerprint(true)
        .with_hostname("https://cdn.example.com")
        .with_url_prefix("/static/");
    let manager = AssetManager::with_roots(config, [temp.path()]).unwrap();

    assert_eq!(
        manager.asset_path("js/file.js"),
        Some(format!("https://cdn.example.com/static/{}", hashed_js()))
    );
    assert!(manager
        .resolve_url(&format!("/static/{}", hashed_js()))
        .is_some());
}

#[test]
fn test_custom_matcher() {
    let temp = asset_root();
    let config = ManagerConfig::default()
        .with_fingerprint(true)
        .with_matcher(Matcher::extensions(["svg"]));
    let manager = AssetManager::with_roots(config, [temp.path()]).unwrap();

    assert_eq!(manager.asset_names(), vec!["img/logo.svg"]);
    assert!(manager.served_name("img/logo.svg").unwrap().ends_with(".svg"));
}

#[test]
fn test_stale_cache_is_replaced() {
    let temp = asset_root();
    let stale = temp.path().join(CACHE_DIR_NAME).join("js/old.deadbeef.js");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "old").unwrap();

    let manager =
        AssetManager::with_roots(ManagerConfig::default().with_fingerprint(true), [temp.path()])
            .unwrap();

    assert!(!stale.exists());
    // The cache directory itself is never indexed
    assert!(manager
        .asset_names()
        .iter()
        .all(|name| !name.starts_with(CACHE_DIR_NAME)));
}

#[test]
fn test_re_adding_root_leaves_no_stale_fingerprints() {
    let temp = asset_root();
    let mut manager = AssetManager::new(ManagerConfig::default().with_fingerprint(true));
    manager.add(temp.path()).unwrap();
    let old_url = manager.asset_path("js/file.js").unwrap();

    fs::write(temp.path().join("js/file.js"), "var code = 'changed';\n").unwrap();
    manager.add(temp.path()).unwrap();

    assert_eq!(manager.roots(), &[temp.path().to_path_buf()]);
    assert_eq!(manager.resolve_url(&old_url), None);
    assert!(!temp.path().join(CACHE_DIR_NAME).join(hashed_js()).exists());

    let new_url = manager.asset_path("js/file.js").unwrap();
    assert_ne!(new_url, old_url);
    let served = manager.resolve_url(&new_url).unwrap();
    assert_eq!(fs::read_to_string(served).unwrap(), "var code = 'changed';\n");

    let manifest = manager.manifest();
    assert_eq!(manifest.paths.len(), 2);
    assert_eq!(manifest.files.len(), 2);
    assert!(manifest.files.values().all(|file| file.exists()));
}

#[test]
fn test_refingerprint_is_stable() {
    let temp = asset_root();
    let config = ManagerConfig::default().with_fingerprint(true);

    let first = AssetManager::with_roots(config.clone(), [temp.path()]).unwrap();
    let second = AssetManager::with_roots(config, [temp.path()]).unwrap();
    assert_eq!(first.asset_path("js/file.js"), second.asset_path("js/file.js"));
}

#[test]
fn test_changed_content_changes_url() {
    let temp = asset_root();
    let config = ManagerConfig::default().with_fingerprint(true);
    let before = AssetManager::with_roots(config.clone(), [temp.path()])
        .unwrap()
        .asset_path("js/file.js");

    fs::write(temp.path().join("js/file.js"), "var code = 'changed';\n").unwrap();
    let after = AssetManager::with_roots(config, [temp.path()])
        .unwrap()
        .asset_path("js/file.js");

    assert_ne!(before, after);
}

#[test]
fn test_script_and_link_tags() {
    let temp = asset_root();
    let manager = AssetManager::with_roots(ManagerConfig::default(), [temp.path()]).unwrap();

    assert_eq!(
        manager.script("js/file.js", &[("defer", "defer")]).unwrap(),
        r#"<script src="/js/file.js" type="text/javascript" defer="defer"></script>"#
    );
    assert_eq!(
        manager.link("css/file.css", &[("media", "screen")]).unwrap(),
        r#"<link href="/css/file.css" rel="stylesheet" type="text/css" media="screen"></link>"#
    );
}

#[test]
fn test_tag_attributes_are_escaped() {
    let temp = asset_root();
    let manager = AssetManager::with_roots(ManagerConfig::default(), [temp.path()]).unwrap();

    let tag = manager
        .script("js/file.js", &[("data-x", r#""><script>alert('x')</script>"#)])
        .unwrap();
    assert!(tag.contains(r#"data-x="&#34;&gt;&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;""#));
}

#[test]
fn test_integrity_attribute() {
    let temp = asset_root();
    let config = ManagerConfig::default()
        .with_fingerprint(true)
        .with_integrity(HashType::Sha256);
    let manager = AssetManager::with_roots(config, [temp.path()]).unwrap();

    let expected = format!("sha256-{}", HashType::Sha256.encoded_digest(JS_CONTENT));
    assert_eq!(manager.integrity("js/file.js"), Some(expected.clone()));

    let tag = manager.script("js/file.js", &[]).unwrap();
    assert!(tag.ends_with(&format!(r#" integrity="{}"></script>"#, expected)));
}

#[test]
fn test_integrity_attribute_empty_in_development_mode() {
    let temp = asset_root();
    let config = ManagerConfig::default().with_integrity(HashType::Sha384);
    let manager = AssetManager::with_roots(config, [temp.path()]).unwrap();

    assert_eq!(manager.integrity("js/file.js"), None);
    assert_eq!(
        manager.link("css/file.css", &[]).unwrap(),
        r#"<link href="/css/file.css" rel="stylesheet" type="text/css" integrity=""></link>"#
    );
}

#[test]
fn test_multiple_roots() {
    let first = asset_root();
    let second = tempdir().unwrap();
    fs::create_dir_all(second.path().join("vendor")).unwrap();
    fs::write(second.path().join("vendor/lib.js"), "lib()").unwrap();

    let manager = AssetManager::with_roots(
        ManagerConfig::default().with_fingerprint(true),
        [first.path(), second.path()],
    )
    .unwrap();

    assert!(manager.asset_path("js/file.js").is_some());
    assert!(manager.asset_path("vendor/lib.js").is_some());
    assert_eq!(manager.roots().len(), 2);
}

#[test]
fn test_manifest_round_trip() {
    let temp = asset_root();
    let config = ManagerConfig::default()
        .with_fingerprint(true)
        .with_url_prefix("assets")
        .with_integrity(HashType::Sha384);
    let manager = AssetManager::with_roots(config, [temp.path()]).unwrap();

    let manifest_path = temp.path().join("out/manifest.json");
    manager.manifest().save(&manifest_path).unwrap();

    let loaded = Manifest::load(&manifest_path).unwrap();
    assert_eq!(loaded.url_prefix, "assets");
    assert_eq!(loaded.hash_type, Some(HashType::Sha384));

    let restored = AssetManager::from_manifest(&manifest_path).unwrap();
    assert!(restored.is_fingerprinted());
    assert_eq!(restored.asset_path("js/file.js"), manager.asset_path("js/file.js"));
    assert_eq!(restored.integrity("js/file.js"), manager.integrity("js/file.js"));

    let served = restored
        .resolve_url(&format!("/assets/{}", hashed_js()))
        .unwrap();
    assert_eq!(fs::read(served).unwrap(), JS_CONTENT);
}

#[test]
fn test_external_manifest() {
    let temp = asset_root();
    let manifest_path = temp.path().join("manifest.json");
    let file = temp.path().join("js/file.js");
    fs::write(
        &manifest_path,
        format!(
            r#"{{"paths": {{"app.js": "app.1234.js"}}, "files": {{"app.1234.js": {:?}}}}}"#,
            file.to_string_lossy()
        ),
    )
    .unwrap();

    let manager = AssetManager::from_manifest(&manifest_path).unwrap();
    assert_eq!(manager.asset_path("app.js").as_deref(), Some("/app.1234.js"));
    assert_eq!(manager.resolve_url("/app.1234.js"), Some(file));
    assert_eq!(manager.integrity("app.js"), None);
}

#[test]
fn test_malformed_manifest() {
    let temp = tempdir().unwrap();
    let manifest_path = temp.path().join("manifest.json");
    fs::write(&manifest_path, r#"{"files": {}}"#).unwrap();

    let err = AssetManager::from_manifest(&manifest_path).unwrap_err();
    assert!(err.to_string().contains("manifest.json"));
}
