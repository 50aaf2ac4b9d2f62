// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Namespace to source file resolution.
//!
//! A [`NamespaceResolver`] holds a table of namespace prefixes mapped to
//! local directories. Resolving a class picks the longest registered prefix
//! the class name starts with and builds a PSR-0 style file path beneath the
//! mapped directory:
//!
//! ```text
//! Acme\Billing            => /home/dev/billing/src
//! Acme\Billing\Invoice_Pdf
//!   => /home/dev/billing/src/Billing/Invoice/Pdf.php
//! ```
//!
//! Prefix matching is done on characters, not on namespace segments, so a
//! prefix `Foo` also matches the class `FooBar`.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexMap;

use crate::host::{ClassRegistry, ClassResolver, ResolverChain, SourceLoader};
use crate::normalize::{normalize_directory, normalize_namespace};
use crate::{DEFAULT_NAMESPACE_SEPARATOR, DEFAULT_SOURCE_EXTENSION, Error};

#[cfg(test)]
#[path = "./loader_test.rs"]
mod loader_test;

/// Resolves class names to files in locally overridden namespaces.
pub struct NamespaceResolver {
    mappings: IndexMap<String, PathBuf>,
    separator: char,
    extension: String,
    loader: Arc<dyn SourceLoader>,
    registered: AtomicBool,
}

impl NamespaceResolver {
    /// Create a resolver that hands found files to `loader`.
    pub fn new(loader: Arc<dyn SourceLoader>) -> Self {
        Self {
            mappings: IndexMap::new(),
            separator: DEFAULT_NAMESPACE_SEPARATOR,
            extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            loader,
            registered: AtomicBool::new(false),
        }
    }

    /// Use `separator` between namespace segments instead of `\`.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Use `extension` for resolved source files instead of `php`.
    pub fn with_extension<S: Into<String>>(mut self, extension: S) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Registered prefixes and their canonical directories, in table order.
    pub fn mappings(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.mappings.iter().map(|(ns, dir)| (ns.as_str(), dir.as_path()))
    }

    /// Map a namespace prefix onto a directory.
    ///
    /// The directory must exist. Registering the same prefix again replaces
    /// its directory.
    pub fn add_namespace<P: AsRef<Path>>(
        &mut self,
        namespace: &str,
        directory: P,
    ) -> crate::Result<()> {
        let prefix = normalize_namespace(namespace, self.separator);
        if prefix.is_empty() {
            return Err(Error::EmptyNamespace(namespace.to_string()));
        }
        let directory = normalize_directory(directory)?;

        tracing::debug!(
            namespace = prefix,
            directory = ?directory,
            "registered namespace overwrite"
        );
        self.mappings.insert(prefix.to_string(), directory);
        Ok(())
    }

    /// Map several namespace prefixes, in order.
    pub fn add_namespaces<I, S, P>(&mut self, namespaces: I) -> crate::Result<()>
    where
        I: IntoIterator<Item = (S, P)>,
        S: AsRef<str>,
        P: AsRef<Path>,
    {
        for (namespace, directory) in namespaces {
            self.add_namespace(namespace.as_ref(), directory)?;
        }
        Ok(())
    }

    /// Compute the file that should hold `class_name`.
    ///
    /// Returns `None` when no registered prefix matches. The file is not
    /// required to exist.
    pub fn resolve(&self, class_name: &str) -> Option<PathBuf> {
        let class_name = normalize_namespace(class_name, self.separator);
        let (prefix, directory) = self.longest_match(class_name)?;

        let tail = class_name[prefix.len()..].trim_matches(self.separator);
        if tail.is_empty() {
            return None;
        }

        let last_segment = prefix.rsplit(self.separator).next().unwrap_or(prefix);
        let path = directory.join(last_segment).join(self.class_to_filename(tail)?);
        debug_assert!(path.starts_with(directory));
        Some(path)
    }

    /// Load `class_name` from its overridden location.
    ///
    /// Returns false without touching the loader when the class does not
    /// resolve or the resolved file does not exist.
    pub fn autoload(&self, class_name: &str) -> bool {
        let Some(path) = self.resolve(class_name) else {
            return false;
        };
        if !path.is_file() {
            tracing::trace!(class = class_name, path = ?path, "resolved file does not exist");
            return false;
        }

        let class_name = normalize_namespace(class_name, self.separator);
        match self.loader.load_source(class_name, &path) {
            Ok(()) => {
                tracing::debug!(class = class_name, path = ?path, "loaded class from overwrite");
                true
            }
            Err(err) => {
                tracing::warn!(
                    class = class_name,
                    path = ?path,
                    "failed to load overwritten class: {err}"
                );
                false
            }
        }
    }

    /// Install this resolver at the front of `chain`.
    ///
    /// Only the first call installs anything.
    pub fn register(self: &Arc<Self>, chain: &ResolverChain) {
        if self
            .registered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        chain.append(Arc::clone(self) as Arc<dyn ClassResolver>, true);
    }

    /// Check if [`register`](Self::register) has installed this resolver.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    fn longest_match(&self, class_name: &str) -> Option<(&str, &Path)> {
        // min_by_key keeps the first of equal keys, so ties go to table order
        self.mappings
            .iter()
            .filter(|(ns, _)| class_name.starts_with(ns.as_str()))
            .min_by_key(|(ns, _)| std::cmp::Reverse(ns.len()))
            .map(|(ns, dir)| (ns.as_str(), dir.as_path()))
    }

    /// Relative file path of a class below its namespace directory.
    ///
    /// Namespace separators and underscores in the bare class name both
    /// become directory separators. Only plain path components are kept, so
    /// the result never leaves the namespace directory. Returns `None` when
    /// no file name is left.
    fn class_to_filename(&self, class_name: &str) -> Option<PathBuf> {
        let (namespace, class) = class_name.rsplit_once(self.separator).unwrap_or(("", class_name));

        let mut dirs = relative_components(namespace.split(self.separator));
        let mut class_parts = relative_components(class.split('_'));
        let file_stem = class_parts.pop()?;
        dirs.extend(class_parts);

        let mut file_name = file_stem.to_os_string();
        file_name.push(".");
        file_name.push(&self.extension);

        let mut path: PathBuf = dirs.into_iter().collect();
        path.push(file_name);
        Some(path)
    }
}

/// Plain path components of each segment, dropping roots, `.` and `..`.
fn relative_components<'a>(segments: impl Iterator<Item = &'a str>) -> Vec<&'a OsStr> {
    segments
        .flat_map(|segment| Path::new(segment).components())
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

impl Default for NamespaceResolver {
    fn default() -> Self {
        Self::new(Arc::new(ClassRegistry::new()))
    }
}

impl ClassResolver for NamespaceResolver {
    fn attempt(&self, class_name: &str) -> bool {
        self.autoload(class_name)
    }
}

impl std::fmt::Debug for NamespaceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceResolver")
            .field("mappings", &self.mappings)
            .field("separator", &self.separator)
            .field("extension", &self.extension)
            .field("registered", &self.is_registered())
            .finish_non_exhaustive()
    }
}
