// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::AtomicUsize;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;

#[fixture]
fn lib_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("FakeLib/Faker")).unwrap();
    std::fs::create_dir_all(tmp.path().join("Types")).unwrap();
    tmp
}

fn canonical(dir: &TempDir) -> PathBuf {
    dunce::canonicalize(dir.path()).unwrap()
}

fn write_source(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).expect("Failed to write source file");
}

#[rstest]
fn test_resolve_file_name_one_level(lib_dir: TempDir) {
    let mut loader = NamespaceResolver::default();
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();

    let expected = canonical(&lib_dir).join("FakeLib").join("Loader.php");
    assert_eq!(loader.resolve("FakeLib\\Loader"), Some(expected));
}

#[rstest]
fn test_resolve_file_name_two_level(lib_dir: TempDir) {
    let mut loader = NamespaceResolver::default();
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();

    let expected = canonical(&lib_dir).join("FakeLib/Faker/Factory.php");
    assert_eq!(loader.resolve("FakeLib\\Faker\\Factory"), Some(expected));
}

#[rstest]
fn test_resolve_with_multilevel_assigned_namespace(lib_dir: TempDir) {
    let second_dir = TempDir::new().unwrap();
    let mut loader = NamespaceResolver::default();
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();
    loader.add_namespace("SecondLib\\Types", second_dir.path()).unwrap();

    assert_eq!(
        loader.resolve("FakeLib\\Faker\\Factory"),
        Some(canonical(&lib_dir).join("FakeLib/Faker/Factory.php"))
    );
    // Only the last segment of the assigned namespace becomes a directory
    assert_eq!(
        loader.resolve("SecondLib\\Types\\AbstractType"),
        Some(canonical(&second_dir).join("Types/AbstractType.php"))
    );
}

#[rstest]
#[case(&["FakeLib", "FakeLib.SecondNamespace"])]
#[case(&["FakeLib.SecondNamespace", "FakeLib"])]
fn test_longest_prefix_wins_regardless_of_order(#[case] order: &[&str]) {
    let short_dir = TempDir::new().unwrap();
    let long_dir = TempDir::new().unwrap();
    let mut loader = NamespaceResolver::default().with_separator('.');

    for ns in order {
        let dir = if *ns == "FakeLib" { &short_dir } else { &long_dir };
        loader.add_namespace(ns, dir.path()).unwrap();
    }

    assert_eq!(
        loader.resolve("FakeLib.SecondNamespace.Example"),
        Some(canonical(&long_dir).join("SecondNamespace/Example.php"))
    );
    assert_eq!(
        loader.resolve("FakeLib.Other.Example"),
        Some(canonical(&short_dir).join("FakeLib/Other/Example.php"))
    );
}

#[rstest]
fn test_resolve_normalizes_class_name(lib_dir: TempDir) {
    let mut loader = NamespaceResolver::default();
    loader.add_namespace("\\FakeLib\\", lib_dir.path()).unwrap();

    let expected = canonical(&lib_dir).join("FakeLib/Loader.php");
    assert_eq!(loader.resolve("\\FakeLib\\Loader"), Some(expected));
}

#[rstest]
fn test_underscore_in_class_name_becomes_directory(lib_dir: TempDir) {
    let mut loader = NamespaceResolver::default();
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();

    let expected = canonical(&lib_dir).join("FakeLib/Some_Dir/Foo/Bar.php");
    assert_eq!(loader.resolve("FakeLib\\Some_Dir\\Foo_Bar"), Some(expected));
}

#[rstest]
fn test_prefix_matches_on_characters(lib_dir: TempDir) {
    let mut loader = NamespaceResolver::default();
    loader.add_namespace("Foo", lib_dir.path()).unwrap();

    let expected = canonical(&lib_dir).join("Foo/Bar.php");
    assert_eq!(loader.resolve("FooBar"), Some(expected));
}

#[rstest]
fn test_no_match(lib_dir: TempDir) {
    let mut loader = NamespaceResolver::default();
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();

    assert_eq!(loader.resolve("OtherLib\\Loader"), None);
    assert!(!loader.autoload("OtherLib\\Loader"));
}

#[rstest]
fn test_class_equal_to_prefix_does_not_resolve(lib_dir: TempDir) {
    let mut loader = NamespaceResolver::default();
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();

    assert_eq!(loader.resolve("FakeLib"), None);
    assert_eq!(loader.resolve("FakeLib\\"), None);
}

#[rstest]
#[case("FakeLib\\/etc/passwd", "FakeLib/etc/passwd.php")]
#[case("FakeLib\\Faker\\/etc_passwd", "FakeLib/Faker/etc/passwd.php")]
#[case("FakeLib\\..\\..\\Secret", "FakeLib/Secret.php")]
#[case("FakeLib\\Faker\\.._.._Secret", "FakeLib/Faker/Secret.php")]
#[case("FakeLib\\.\\Loader", "FakeLib/Loader.php")]
fn test_resolve_stays_inside_directory(
    lib_dir: TempDir,
    #[case] class_name: &str,
    #[case] expected: &str,
) {
    let mut loader = NamespaceResolver::default();
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();

    let base = canonical(&lib_dir);
    let resolved = loader.resolve(class_name).expect("class should resolve");
    assert!(resolved.starts_with(&base), "{resolved:?} escaped {base:?}");
    assert_eq!(resolved, base.join(expected));
}

#[rstest]
#[case("FakeLib\\Sub\\_")]
#[case("FakeLib\\Sub\\__")]
#[case("FakeLib\\..")]
#[case("FakeLib\\Faker\\/")]
fn test_resolve_without_file_name(lib_dir: TempDir, #[case] class_name: &str) {
    let mut loader = NamespaceResolver::default();
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();

    assert_eq!(loader.resolve(class_name), None);
    assert!(!loader.autoload(class_name));
}

#[rstest]
fn test_custom_extension(lib_dir: TempDir) {
    let mut loader = NamespaceResolver::default()
        .with_separator('.')
        .with_extension(".rb");
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();

    assert_eq!(loader.extension(), "rb");
    assert_eq!(
        loader.resolve("FakeLib.Loader"),
        Some(canonical(&lib_dir).join("FakeLib/Loader.rb"))
    );
}

#[rstest]
fn test_add_namespace_overwrites_same_prefix(lib_dir: TempDir) {
    let other_dir = TempDir::new().unwrap();
    let mut loader = NamespaceResolver::default();
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();
    loader.add_namespace("\\FakeLib", other_dir.path()).unwrap();

    assert_eq!(loader.mappings().count(), 1);
    assert_eq!(
        loader.resolve("FakeLib\\Loader"),
        Some(canonical(&other_dir).join("FakeLib/Loader.php"))
    );
}

#[rstest]
fn test_add_namespaces_later_entries_win(lib_dir: TempDir) {
    let other_dir = TempDir::new().unwrap();
    let mut loader = NamespaceResolver::default();
    loader
        .add_namespaces([
            ("FakeLib", lib_dir.path()),
            ("SecondLib", lib_dir.path()),
            ("FakeLib", other_dir.path()),
        ])
        .unwrap();

    let prefixes: Vec<&str> = loader.mappings().map(|(ns, _)| ns).collect();
    assert_eq!(prefixes, vec!["FakeLib", "SecondLib"]);
    assert_eq!(
        loader.resolve("FakeLib\\Loader"),
        Some(canonical(&other_dir).join("FakeLib/Loader.php"))
    );
}

#[rstest]
fn test_add_namespace_missing_directory(lib_dir: TempDir) {
    let mut loader = NamespaceResolver::default();
    let result = loader.add_namespace("FakeLib", lib_dir.path().join("missing"));

    match result {
        Err(Error::DirectoryNotFound { .. }) => {}
        other => panic!("Expected DirectoryNotFound, got: {:?}", other),
    }
    assert_eq!(loader.mappings().count(), 0);
}

#[rstest]
fn test_add_namespace_empty_prefix(lib_dir: TempDir) {
    let mut loader = NamespaceResolver::default();
    match loader.add_namespace("\\\\", lib_dir.path()) {
        Err(Error::EmptyNamespace(ns)) => assert_eq!(ns, "\\\\"),
        other => panic!("Expected EmptyNamespace, got: {:?}", other),
    }
}

#[rstest]
fn test_autoload_loads_one_level(lib_dir: TempDir) {
    let registry = Arc::new(ClassRegistry::new());
    let mut loader = NamespaceResolver::new(registry.clone());
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();

    let file = canonical(&lib_dir).join("FakeLib/Loader.php");
    write_source(&file, "class Loader {}");

    assert!(loader.autoload("FakeLib\\Loader"));
    assert!(registry.is_defined("FakeLib\\Loader"));
    assert_eq!(registry.path_of("FakeLib\\Loader"), Some(file));
}

#[rstest]
fn test_autoload_loads_multilevel_assigned_namespace(lib_dir: TempDir) {
    let registry = Arc::new(ClassRegistry::new());
    let mut loader = NamespaceResolver::new(registry.clone());
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();
    loader.add_namespace("SecondLib\\Types", lib_dir.path()).unwrap();

    write_source(
        &canonical(&lib_dir).join("Types/AbstractType.php"),
        "abstract class AbstractType {}",
    );

    assert!(loader.autoload("SecondLib\\Types\\AbstractType"));
    let class = registry.get("SecondLib\\Types\\AbstractType").unwrap();
    assert_eq!(class.source, "abstract class AbstractType {}");
}

#[rstest]
fn test_autoload_missing_file(lib_dir: TempDir) {
    let registry = Arc::new(ClassRegistry::new());
    let mut loader = NamespaceResolver::new(registry.clone());
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();

    assert!(loader.resolve("FakeLib\\Missing").is_some());
    assert!(!loader.autoload("FakeLib\\Missing"));
    assert!(registry.is_empty());
}

struct FailingLoader {
    calls: AtomicUsize,
}

impl SourceLoader for FailingLoader {
    fn load_source(&self, _class_name: &str, path: &Path) -> crate::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::ValidationFailed(format!("cannot load {}", path.display())))
    }
}

#[rstest]
fn test_autoload_loader_failure_reports_false(lib_dir: TempDir) {
    let failing = Arc::new(FailingLoader {
        calls: AtomicUsize::new(0),
    });
    let mut loader = NamespaceResolver::new(failing.clone());
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();
    write_source(&canonical(&lib_dir).join("FakeLib/Loader.php"), "");

    assert!(!loader.autoload("FakeLib\\Loader"));
    assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
}

#[rstest]
fn test_register_is_idempotent() {
    let chain = ResolverChain::new();
    let loader = Arc::new(NamespaceResolver::default());
    assert!(!loader.is_registered());

    loader.register(&chain);
    loader.register(&chain);
    loader.register(&chain);

    assert!(loader.is_registered());
    assert_eq!(chain.len(), 1);
}

#[rstest]
fn test_registered_flag_is_per_instance() {
    let chain = ResolverChain::new();
    let first = Arc::new(NamespaceResolver::default());
    let second = Arc::new(NamespaceResolver::default());

    first.register(&chain);
    assert!(!second.is_registered());

    second.register(&chain);
    assert_eq!(chain.len(), 2);
}

struct Fallback;

impl ClassResolver for Fallback {
    fn attempt(&self, _class_name: &str) -> bool {
        false
    }
}

#[rstest]
fn test_register_prepends_to_chain(lib_dir: TempDir) {
    let chain = ResolverChain::new();
    chain.append(Arc::new(Fallback), false);

    let registry = Arc::new(ClassRegistry::new());
    let mut loader = NamespaceResolver::new(registry.clone());
    loader.add_namespace("FakeLib", lib_dir.path()).unwrap();
    write_source(&canonical(&lib_dir).join("FakeLib/Loader.php"), "class Loader {}");

    let loader = Arc::new(loader);
    loader.register(&chain);

    let as_resolver: Arc<dyn ClassResolver> = loader.clone();
    assert_eq!(chain.position_of(&as_resolver), Some(0));
    assert!(chain.load("FakeLib\\Loader"));
    assert!(registry.is_defined("FakeLib\\Loader"));
    assert!(!chain.load("OtherLib\\Loader"));
}
