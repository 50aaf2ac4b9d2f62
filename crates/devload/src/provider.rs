// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Single-step development provider.
//!
//! Applies the develop file from inside the host's provider registration.
//! Namespace overwrites installed this late only affect classes that have
//! not been loaded yet; prefer [`crate::Environment`], which runs before
//! the application boots.

use std::sync::Arc;

use crate::{Application, DevelopConfig, ResolverChain, SourceLoader, derive_actions};

#[cfg(test)]
#[path = "./provider_test.rs"]
mod provider_test;

/// Registers namespace overwrites and development providers with a host.
pub struct DevServiceProvider {
    config: Option<DevelopConfig>,
    loader: Arc<dyn SourceLoader>,
}

impl DevServiceProvider {
    pub fn new(config: Option<DevelopConfig>, loader: Arc<dyn SourceLoader>) -> Self {
        Self { config, loader }
    }

    /// Apply the develop file to `app` and `chain`.
    ///
    /// Nothing is applied when the application is not local, when there is
    /// no develop file, or when an [`crate::Environment`] already applied
    /// one (`environment_active`). Returns true if anything was applied.
    pub fn register(
        &self,
        app: &mut dyn Application,
        chain: &ResolverChain,
        environment_active: bool,
    ) -> crate::Result<bool> {
        let actions = match derive_actions(self.config.as_ref(), app.is_local()) {
            Ok(actions) => actions,
            Err(reason) => {
                tracing::warn!("DevServiceProvider: {reason}");
                return Ok(false);
            }
        };

        if environment_active {
            tracing::debug!("DevServiceProvider: environment already applied, skipping");
            return Ok(false);
        }

        if !actions.namespace_mappings.is_empty() {
            let resolver = Arc::new(actions.build_resolver(Arc::clone(&self.loader))?);
            resolver.register(chain);
        }

        for provider in &actions.providers {
            app.register_provider(provider);
        }

        Ok(!actions.is_empty())
    }
}
