mod common;

use common::PluginTree;
use hookhost_core::{discover, validate_package, Platform, PluginError, PluginManifest};

#[test]
fn test_discover_and_parse_tree() {
    let tree = PluginTree::new();
    tree.add_manifest("alpha", "alpha");
    tree.add_manifest("nested/beta", "beta");
    std::fs::write(tree.path().join("alpha").join("readme.md"), "Alpha plugin").unwrap();

    let manifests = discover(&[tree.path()]);
    assert_eq!(manifests.len(), 2);

    let parsed: Vec<PluginManifest> = manifests
        .iter()
        .map(|path| PluginManifest::load(path).unwrap())
        .collect();
    assert_eq!(parsed[0].name(), "alpha");
    assert_eq!(parsed[0].description(), "Alpha plugin");
    assert_eq!(parsed[1].name(), "beta");
    assert_eq!(
        parsed[1].shared_lib_path(),
        tree.path()
            .join("nested")
            .join("beta")
            .join(Platform::current().library_filename("beta"))
    );
}

#[test]
fn test_package_validation() {
    let manifest = "plugin_name: foo\nplugin_version: '1'\nauthor: a\nemail: a@b.c\nshared_lib: foo\n";

    validate_package(&["plugin.yaml", "libfoo.so"], manifest, Platform::Linux).unwrap();

    let err = validate_package(&["plugin.yaml"], manifest, Platform::Linux).unwrap_err();
    assert!(matches!(err, PluginError::PluginNotFound { ref file } if file == "libfoo.so"));
}
