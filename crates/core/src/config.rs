//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Library code never reads environment variables; binaries turn raw env values into a
//! [`CoreConfig`] with the helpers below.

use crate::catalog::CodeCatalog;
use crate::constants::DEFAULT_DATA_DIR;
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    catalog_path: Option<PathBuf>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `catalog_path`, when given, must point at an existing file. Without it the built-in
    /// catalog is used.
    pub fn new(data_dir: PathBuf, catalog_path: Option<PathBuf>) -> CoreResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(CoreError::InvalidInput("data_dir cannot be empty".into()));
        }
        if data_dir.is_file() {
            return Err(CoreError::InvalidInput(format!(
                "data_dir {} is a file, expected a directory",
                data_dir.display()
            )));
        }

        if let Some(path) = &catalog_path {
            if !path.is_file() {
                return Err(CoreError::InvalidInput(format!(
                    "catalog file {} does not exist",
                    path.display()
                )));
            }
        }

        Ok(Self {
            data_dir,
            catalog_path,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog_path.as_deref()
    }

    /// Loads the configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> CoreResult<CodeCatalog> {
        match &self.catalog_path {
            Some(path) => CodeCatalog::from_path(path),
            None => CodeCatalog::builtin(),
        }
    }
}

/// Resolve the data directory from an optional raw value.
///
/// `None` or blank falls back to [`DEFAULT_DATA_DIR`] relative to the working directory.
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    non_blank(value)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Resolve the optional catalog override. Blank counts as unset.
pub fn catalog_path_from_env_value(value: Option<String>) -> Option<PathBuf> {
    non_blank(value).map(PathBuf::from)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
