// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Decide what a develop file asks for, without touching the host.

use std::path::PathBuf;

use crate::{
    DEFAULT_NAMESPACE_SEPARATOR, DEFAULT_SOURCE_EXTENSION, DevelopConfig, NamespaceResolver,
};

#[cfg(test)]
#[path = "./actions_test.rs"]
mod actions_test;

/// Outcome of reading the develop settings.
pub type Decision = std::result::Result<Actions, Disabled>;

/// Reasons the development overrides are switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disabled {
    /// No develop file, or the file is empty.
    MissingConfig,
    /// The develop file sets `enabled: false`.
    DisabledInConfig,
    /// The application is not running in a local environment.
    NotLocal,
}

impl std::fmt::Display for Disabled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingConfig => {
                write!(f, "could not find a develop file (config/develop.yaml). Disabling")
            }
            Self::DisabledInConfig => write!(f, "develop file is disabled. Disabling"),
            Self::NotLocal => {
                write!(f, "development overrides should only be used in local environments. Disabling")
            }
        }
    }
}

/// What should be applied to the host when overrides are enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actions {
    /// `psr-0` namespace prefixes and their unexpanded directories.
    pub namespace_mappings: Vec<(String, String)>,

    /// Provider identifiers to register with the application.
    pub providers: Vec<String>,

    /// Overwrite schemes present in the develop file that will be ignored.
    pub ignored_schemes: Vec<String>,

    pub separator: char,
    pub extension: String,

    /// Directory relative overwrite paths are resolved against.
    pub base_dir: Option<PathBuf>,
}

impl Actions {
    /// Check if there is anything to apply.
    pub fn is_empty(&self) -> bool {
        self.namespace_mappings.is_empty() && self.providers.is_empty()
    }

    /// Build a resolver for the namespace mappings.
    ///
    /// Relative directories are resolved against [`Actions::base_dir`];
    /// every directory must exist.
    pub fn build_resolver(
        &self,
        loader: std::sync::Arc<dyn crate::SourceLoader>,
    ) -> crate::Result<NamespaceResolver> {
        let mut resolver = NamespaceResolver::new(loader)
            .with_separator(self.separator)
            .with_extension(self.extension.as_str());

        for (namespace, directory) in &self.namespace_mappings {
            let directory = crate::expand_directory(directory, self.base_dir.as_deref())?;
            resolver.add_namespace(namespace, directory)?;
        }
        Ok(resolver)
    }
}

/// Work out which development overrides apply.
///
/// A missing develop file is checked first so that hosts without one never
/// see a warning about the environment.
pub fn derive_actions(config: Option<&DevelopConfig>, is_local: bool) -> Decision {
    let Some(config) = config else {
        return Err(Disabled::MissingConfig);
    };
    if !config.is_enabled() {
        return Err(Disabled::DisabledInConfig);
    }
    if !is_local {
        return Err(Disabled::NotLocal);
    }

    Ok(Actions {
        namespace_mappings: config
            .psr0_overwrites()
            .map(|(ns, dir)| (ns.to_string(), dir.to_string()))
            .collect(),
        providers: config.providers.clone(),
        ignored_schemes: config
            .unsupported_schemes()
            .into_iter()
            .map(String::from)
            .collect(),
        separator: config.namespace_separator.unwrap_or(DEFAULT_NAMESPACE_SEPARATOR),
        extension: config
            .source_extension
            .clone()
            .unwrap_or_else(|| DEFAULT_SOURCE_EXTENSION.to_string()),
        base_dir: config.base_dir().map(PathBuf::from),
    })
}
