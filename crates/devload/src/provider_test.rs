// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;
use tempfile::TempDir;

use super::*;
use crate::{BootstrapHook, ClassRegistry};

struct FakeApp {
    local: bool,
    providers: Vec<String>,
}

impl Application for FakeApp {
    fn is_local(&self) -> bool {
        self.local
    }

    fn register_provider(&mut self, provider: &str) {
        self.providers.push(provider.to_string());
    }

    fn before_register_providers(&mut self, hook: BootstrapHook) {
        hook(self);
    }
}

fn app(local: bool) -> FakeApp {
    FakeApp {
        local,
        providers: Vec::new(),
    }
}

fn config_with_lib(lib: &TempDir) -> DevelopConfig {
    let yaml = format!(
        "package-overwrites:\n  psr-0:\n    FakeLib: {}\nproviders:\n  - DebugProvider\n",
        lib.path().display()
    );
    DevelopConfig::from_yaml(yaml).unwrap().unwrap()
}

#[rstest]
fn test_register_applies_develop_file() {
    let lib = TempDir::new().unwrap();
    let provider = DevServiceProvider::new(
        Some(config_with_lib(&lib)),
        Arc::new(ClassRegistry::new()),
    );
    let chain = ResolverChain::new();
    let mut app = app(true);

    assert!(provider.register(&mut app, &chain, false).unwrap());
    assert_eq!(chain.len(), 1);
    assert_eq!(app.providers, vec!["DebugProvider"]);
}

#[rstest]
fn test_register_outside_local_environment() {
    let lib = TempDir::new().unwrap();
    let provider = DevServiceProvider::new(
        Some(config_with_lib(&lib)),
        Arc::new(ClassRegistry::new()),
    );
    let chain = ResolverChain::new();
    let mut app = app(false);

    assert!(!provider.register(&mut app, &chain, false).unwrap());
    assert!(chain.is_empty());
    assert!(app.providers.is_empty());
}

#[rstest]
fn test_register_without_develop_file() {
    let provider = DevServiceProvider::new(None, Arc::new(ClassRegistry::new()));
    let chain = ResolverChain::new();
    let mut app = app(true);

    assert!(!provider.register(&mut app, &chain, false).unwrap());
    assert!(chain.is_empty());
}

#[rstest]
fn test_register_skips_when_environment_active() {
    let lib = TempDir::new().unwrap();
    let provider = DevServiceProvider::new(
        Some(config_with_lib(&lib)),
        Arc::new(ClassRegistry::new()),
    );
    let chain = ResolverChain::new();
    let mut app = app(true);

    assert!(!provider.register(&mut app, &chain, true).unwrap());
    assert!(chain.is_empty());
    assert!(app.providers.is_empty());
}

#[rstest]
fn test_register_providers_only() {
    let config = DevelopConfig::from_yaml("providers: [DebugProvider]\n")
        .unwrap()
        .unwrap();
    let provider = DevServiceProvider::new(Some(config), Arc::new(ClassRegistry::new()));
    let chain = ResolverChain::new();
    let mut app = app(true);

    assert!(provider.register(&mut app, &chain, false).unwrap());
    assert!(chain.is_empty());
    assert_eq!(app.providers, vec!["DebugProvider"]);
}
