// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Bootstrap glue that applies a develop file to a host application.
//!
//! Call [`Environment::init`] as soon as the host's class loader chain
//! exists, so overridden namespaces win over installed packages. Once the
//! application object is available, [`Environment::configure`] queues the
//! development-only providers ahead of the default provider registration.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::unsync::OnceCell;

use crate::{
    Actions, Application, DevelopConfig, Disabled, Error, NamespaceResolver, ResolverChain,
    SourceLoader, derive_actions, find_config,
};

#[cfg(test)]
#[path = "./environment_test.rs"]
mod environment_test;

/// Where to find the develop file and how the host is running.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentOptions {
    /// Explicit develop file, used instead of looking under `app_root`.
    pub config_path: Option<PathBuf>,

    /// Application root holding `config/develop.yaml`.
    pub app_root: Option<PathBuf>,

    /// Whether the host is a local development environment.
    pub is_local: bool,
}

/// Development environment state for one application run.
#[derive(Debug)]
pub struct Environment {
    options: EnvironmentOptions,
    config: OnceCell<Option<DevelopConfig>>,
    actions: Option<Actions>,
    did_init: bool,
    active: Arc<AtomicBool>,
    resolver: Option<Arc<NamespaceResolver>>,
}

impl Environment {
    pub fn new(options: EnvironmentOptions) -> Self {
        Self {
            options,
            config: OnceCell::new(),
            actions: None,
            did_init: false,
            active: Arc::new(AtomicBool::new(false)),
            resolver: None,
        }
    }

    /// The develop file in use, if one was given or found.
    pub fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.options.config_path {
            return Some(path.clone());
        }
        self.options.app_root.as_ref().and_then(find_config)
    }

    /// The develop settings, loaded on first use.
    pub fn config(&self) -> crate::Result<Option<&DevelopConfig>> {
        let config = self.config.get_or_try_init(|| match self.config_path() {
            Some(path) => DevelopConfig::load(path),
            None => Ok(None),
        })?;
        Ok(config.as_ref())
    }

    /// Check if a develop file exists and is switched on.
    ///
    /// This does not mean anything was applied, see [`Environment::is_active`].
    pub fn is_enabled(&self) -> crate::Result<bool> {
        Ok(self.config()?.is_some_and(DevelopConfig::is_enabled))
    }

    /// Check if namespace overwrites or providers were applied.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// The installed resolver, when the develop file has overwrites.
    pub fn resolver(&self) -> Option<&Arc<NamespaceResolver>> {
        self.resolver.as_ref()
    }

    /// Apply the namespace overwrites to `chain`.
    ///
    /// Returns true if the development environment applies to this run.
    pub fn init(
        &mut self,
        chain: &ResolverChain,
        loader: Arc<dyn SourceLoader>,
    ) -> crate::Result<bool> {
        let decision = derive_actions(self.config()?, self.options.is_local);
        self.did_init = true;

        let actions = match decision {
            Ok(actions) => actions,
            Err(reason) => {
                log_disabled(reason);
                return Ok(false);
            }
        };

        for scheme in &actions.ignored_schemes {
            tracing::warn!("unsupported package overwrite scheme '{scheme}' is ignored");
        }

        if !actions.namespace_mappings.is_empty() {
            let resolver = Arc::new(actions.build_resolver(loader)?);
            resolver.register(chain);
            tracing::info!(
                count = actions.namespace_mappings.len(),
                "installed development namespace overwrites"
            );
            self.resolver = Some(resolver);
            self.active.store(true, Ordering::Release);
        }

        self.actions = Some(actions);
        Ok(true)
    }

    /// Queue the development providers on `app`.
    ///
    /// Returns true if overwrites or providers were applied so far. The
    /// providers themselves are registered when the host runs the hook.
    pub fn configure(&self, app: &mut dyn Application) -> crate::Result<bool> {
        if !self.did_init {
            return Err(Error::NotInitialized);
        }

        let Some(actions) = &self.actions else {
            return Ok(false);
        };

        let providers = actions.providers.clone();
        let active = Arc::clone(&self.active);
        app.before_register_providers(Box::new(move |app: &mut dyn Application| {
            for provider in &providers {
                tracing::debug!(provider = provider.as_str(), "registering development provider");
                app.register_provider(provider);
                active.store(true, Ordering::Release);
            }
        }));

        Ok(self.is_active())
    }
}

fn log_disabled(reason: Disabled) {
    match reason {
        // having no develop file is the normal production setup
        Disabled::MissingConfig | Disabled::DisabledInConfig => {
            tracing::debug!("development environment: {reason}");
        }
        Disabled::NotLocal => tracing::warn!("development environment: {reason}"),
    }
}
