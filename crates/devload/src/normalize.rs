// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Normalization of namespace prefixes and overwrite directories.

use std::path::{Path, PathBuf};

use crate::Error;

#[cfg(test)]
#[path = "./normalize_test.rs"]
mod normalize_test;

/// Strip leading and trailing namespace separators.
///
/// Separators inside the namespace are kept as they are.
pub fn normalize_namespace(namespace: &str, separator: char) -> &str {
    namespace.trim_matches(separator)
}

/// Resolve a directory to its canonical absolute path.
pub fn normalize_directory<P: AsRef<Path>>(directory: P) -> crate::Result<PathBuf> {
    let directory = directory.as_ref();
    dunce::canonicalize(directory).map_err(|error| Error::DirectoryNotFound {
        path: directory.to_path_buf(),
        error,
    })
}

/// Expand a directory from a develop file into a usable path.
///
/// Home-relative (`~/`) entries are resolved against the home directory,
/// absolute entries are kept, and relative entries are joined onto
/// `base_dir` (the directory holding the develop file). The result is not
/// canonicalized.
pub fn expand_directory(directory: &str, base_dir: Option<&Path>) -> crate::Result<PathBuf> {
    if directory == "~" || directory.starts_with("~/") {
        let home = dirs::home_dir().ok_or_else(|| {
            Error::ValidationFailed("Cannot resolve ~ without HOME".to_string())
        })?;
        let rel = directory.strip_prefix("~/").unwrap_or("");
        return Ok(home.join(rel));
    }

    let path = Path::new(directory);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    match base_dir {
        Some(base) => Ok(base.join(path)),
        None => Ok(path.to_path_buf()),
    }
}
