// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! devload - Development Namespace Overrides
//!
//! This crate lets a developer redirect class namespaces that are normally
//! provided by installed packages to local directories on disk, and wires
//! that redirection into a host application's bootstrap only when it runs
//! in a local environment.
//!
//! # Overview
//!
//! The core is the [`NamespaceResolver`], which maps a fully qualified class
//! name onto a source file path using longest-prefix namespace matching and
//! PSR-0 style file naming. [`Environment`] and [`DevServiceProvider`] read a
//! develop file and install the resolver at the front of the host's
//! [`ResolverChain`].
//!
//! # Example
//!
//! ```yaml
//! # config/develop.yaml
//! api: devload/v0
//!
//! package-overwrites:
//!   psr-0:
//!     Acme\Billing: ~/src/billing/src
//!
//! providers:
//!   - App\Providers\DebugServiceProvider
//! ```

pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod host;
pub mod loader;
pub mod normalize;
pub mod provider;

pub use actions::{Actions, Decision, Disabled, derive_actions};
pub use config::{ApiVersion, DevelopConfig, find_config};
pub use environment::{Environment, EnvironmentOptions};
pub use error::{Error, Result};
pub use host::{
    Application, BootstrapHook, ClassRegistry, ClassResolver, LoadedClass, ResolverChain,
    SourceLoader,
};
pub use loader::NamespaceResolver;
pub use normalize::{expand_directory, normalize_directory, normalize_namespace};
pub use provider::DevServiceProvider;

/// Well-known location of the develop file, relative to the application root.
pub const DEVELOP_CONFIG_PATH: &str = "config/develop.yaml";

/// Namespace separator used when none is configured.
pub const DEFAULT_NAMESPACE_SEPARATOR: char = '\\';

/// Source file extension used when none is configured.
pub const DEFAULT_SOURCE_EXTENSION: &str = "php";

/// Package overwrite scheme handled by the resolver.
pub const PSR0_SCHEME: &str = "psr-0";
