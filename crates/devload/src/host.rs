// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Interfaces to the host application that loads classes and providers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

#[cfg(test)]
#[path = "./host_test.rs"]
mod host_test;

/// A fallback lookup consulted when a class is not yet defined.
pub trait ClassResolver: Send + Sync {
    /// Try to define `class_name`, returning true if it is now available.
    fn attempt(&self, class_name: &str) -> bool;
}

/// Ordered list of class resolvers tried until one succeeds.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: RwLock<Vec<Arc<dyn ClassResolver>>>,
}

impl ResolverChain {
    /// Create a new empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resolver to the chain.
    ///
    /// When `prepend` is true the resolver is consulted before every
    /// resolver already in the chain.
    pub fn append(&self, resolver: Arc<dyn ClassResolver>, prepend: bool) {
        let mut resolvers = self
            .resolvers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if prepend {
            resolvers.insert(0, resolver);
        } else {
            resolvers.push(resolver);
        }
    }

    /// Ask each resolver in order to define `class_name`.
    pub fn load(&self, class_name: &str) -> bool {
        let resolvers = self
            .resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        resolvers.iter().any(|r| r.attempt(class_name))
    }

    /// Position of `resolver` in the chain, compared by identity.
    pub fn position_of(&self, resolver: &Arc<dyn ClassResolver>) -> Option<usize> {
        self.resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .position(|r| std::ptr::addr_eq(Arc::as_ptr(r), Arc::as_ptr(resolver)))
    }

    /// Number of installed resolvers.
    pub fn len(&self) -> usize {
        self.resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no resolver is installed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverChain")
            .field("len", &self.len())
            .finish()
    }
}

/// Makes the class stored in a source file available to the host.
pub trait SourceLoader: Send + Sync {
    fn load_source(&self, class_name: &str, path: &Path) -> crate::Result<()>;
}

/// A class defined through a [`SourceLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedClass {
    /// File the class was loaded from.
    pub path: PathBuf,

    /// Contents of that file at load time.
    pub source: String,
}

/// In-process table of defined classes.
///
/// Loading a class that is already defined succeeds without reading the
/// file again.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: RwLock<HashMap<String, LoadedClass>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if `class_name` has been defined.
    pub fn is_defined(&self, class_name: &str) -> bool {
        self.classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(class_name)
    }

    /// File that `class_name` was loaded from.
    pub fn path_of(&self, class_name: &str) -> Option<PathBuf> {
        self.classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(class_name)
            .map(|c| c.path.clone())
    }

    /// Snapshot of a defined class.
    pub fn get(&self, class_name: &str) -> Option<LoadedClass> {
        self.classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(class_name)
            .cloned()
    }

    /// Number of defined classes.
    pub fn len(&self) -> usize {
        self.classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SourceLoader for ClassRegistry {
    fn load_source(&self, class_name: &str, path: &Path) -> crate::Result<()> {
        if self.is_defined(class_name) {
            return Ok(());
        }

        let source = std::fs::read_to_string(path).map_err(|error| crate::Error::ReadFailed {
            path: path.to_path_buf(),
            error,
        })?;

        self.classes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(class_name.to_string())
            .or_insert_with(|| LoadedClass {
                path: path.to_path_buf(),
                source,
            });
        Ok(())
    }
}

/// Deferred work run by the host right before it registers its providers.
pub type BootstrapHook = Box<dyn FnOnce(&mut dyn Application)>;

/// The parts of the host application used to wire in development providers.
pub trait Application {
    /// Whether the application runs in a local development environment.
    fn is_local(&self) -> bool;

    /// Register an additional service provider by identifier.
    fn register_provider(&mut self, provider: &str);

    /// Queue `hook` to run before the default provider registration phase.
    fn before_register_providers(&mut self, hook: BootstrapHook);
}
