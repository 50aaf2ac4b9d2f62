// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Develop file parsing and data types for `config/develop.yaml`.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{DEVELOP_CONFIG_PATH, PSR0_SCHEME};

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

/// API version for develop files.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ApiVersion {
    #[default]
    #[serde(rename = "devload/v0")]
    V0,
}

/// Helper for two-stage deserialization to determine API version first.
#[derive(Deserialize)]
struct ApiVersionMapping {
    #[serde(default)]
    api: ApiVersion,
}

/// Namespace prefix to directory table for one overwrite scheme.
pub type Overwrites = IndexMap<String, String>;

/// Development settings from a develop file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DevelopConfig {
    /// API version identifier.
    #[serde(default)]
    pub api: ApiVersion,

    /// Explicit switch. A develop file without this key is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Separator between namespace segments (default `\`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_separator: Option<char>,

    /// Extension of class source files (default `php`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_extension: Option<String>,

    /// Overwrites keyed by scheme (only `psr-0` is handled).
    /// Directories may be absolute, home-relative (`~/`) or relative to
    /// the develop file.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub package_overwrites: IndexMap<String, Option<Overwrites>>,

    /// Extra service providers registered only in development.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub providers: Vec<String>,

    /// Path to the file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl DevelopConfig {
    /// Parse a develop file from YAML.
    ///
    /// An empty document or an empty mapping yields `None`, the same as
    /// having no file.
    pub fn from_yaml<S: Into<String>>(yaml: S) -> crate::Result<Option<Self>> {
        let yaml = yaml.into();

        // Stage 1: Parse to get API version
        let value: serde_yaml::Value =
            serde_yaml::from_str(&yaml).map_err(|e| crate::Error::InvalidYaml {
                error: e,
                yaml_content: yaml.clone(),
            })?;

        let is_empty_mapping = value.as_mapping().is_some_and(serde_yaml::Mapping::is_empty);
        if value.is_null() || is_empty_mapping {
            return Ok(None);
        }

        let with_version: ApiVersionMapping =
            serde_yaml::from_value(value.clone()).map_err(|e| crate::Error::InvalidYaml {
                error: e,
                yaml_content: yaml.clone(),
            })?;

        // Stage 2: Deserialize based on version
        match with_version.api {
            ApiVersion::V0 => serde_yaml::from_value(value)
                .map(Some)
                .map_err(|e| crate::Error::InvalidYaml {
                    error: e,
                    yaml_content: yaml,
                }),
        }
    }

    /// Load a develop file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Option<Self>> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| crate::Error::ReadFailed {
            path: path.to_path_buf(),
            error: e,
        })?;

        let config = Self::from_yaml(yaml)?.map(|mut config| {
            config.source_path = Some(path.to_path_buf());
            config
        });
        Ok(config)
    }

    /// Whether the develop settings should be applied at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// The `psr-0` namespace overwrites, in file order.
    pub fn psr0_overwrites(&self) -> impl Iterator<Item = (&str, &str)> {
        self.package_overwrites
            .get(PSR0_SCHEME)
            .and_then(Option::as_ref)
            .into_iter()
            .flatten()
            .map(|(ns, dir)| (ns.as_str(), dir.as_str()))
    }

    /// Overwrite schemes present in the file that are not handled.
    pub fn unsupported_schemes(&self) -> Vec<&str> {
        self.package_overwrites
            .keys()
            .map(String::as_str)
            .filter(|scheme| *scheme != PSR0_SCHEME)
            .collect()
    }

    /// Directory relative overwrite paths are resolved against.
    pub fn base_dir(&self) -> Option<&Path> {
        self.source_path.as_deref().and_then(Path::parent)
    }
}

/// Locate the develop file of an application, if there is one.
pub fn find_config<P: AsRef<Path>>(app_root: P) -> Option<PathBuf> {
    let path = app_root.as_ref().join(DEVELOP_CONFIG_PATH);
    path.is_file().then_some(path)
}
