// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for devload operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with devload Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during devload operations.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Overwrite directory could not be canonicalized
    #[error("Namespace directory not found: {path:?}")]
    #[diagnostic(
        code(devload::directory_not_found),
        help("Check that the directory in package-overwrites exists and is readable")
    )]
    DirectoryNotFound {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Namespace prefix made only of separators
    #[error("Namespace prefix {0:?} is empty after normalization")]
    #[diagnostic(
        code(devload::empty_namespace),
        help("Use a namespace such as 'Vendor\\Package' as the overwrite key")
    )]
    EmptyNamespace(String),

    /// Invalid YAML in develop file
    #[error("Invalid develop file: {error}")]
    #[diagnostic(
        code(devload::invalid_yaml),
        help("Check YAML syntax and ensure 'api: devload/v0' is present")
    )]
    InvalidYaml {
        #[source]
        error: serde_yaml::Error,
        yaml_content: String,
    },

    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(devload::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Environment used before init
    #[error("Develop environment must be initialized before configuring the application")]
    #[diagnostic(
        code(devload::not_initialized),
        help("Call Environment::init right after the class loader chain is set up")
    )]
    NotInitialized,

    /// Validation error
    #[error("Validation failed: {0}")]
    #[diagnostic(code(devload::validation_failed))]
    ValidationFailed(String),

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(devload::io_error))]
    Io(#[from] std::io::Error),
}
