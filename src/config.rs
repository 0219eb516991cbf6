// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::storage::{FileStore, LocalStore, MemoryStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Local,
    Memory,
}

/// Configuration surface: a directory to expose, or a single file, plus an
/// optional CSV delimiter and the backend kind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,
    pub directory: Option<PathBuf>,
    pub file: Option<PathBuf>,
    pub delimiter: Option<String>,
}

impl Config {
    pub fn with_directory(path: impl Into<PathBuf>) -> Self {
        Config { directory: Some(path.into()), ..Config::default() }
    }

    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Config { file: Some(path.into()), ..Config::default() }
    }

    /// Load from a YAML or JSON file, decided by extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("cannot read config {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            serde_json::from_str(&raw)
                .map_err(|e| Error::Configuration(format!("invalid config: {}", e)))
        } else {
            serde_yaml::from_str(&raw)
                .map_err(|e| Error::Configuration(format!("invalid config: {}", e)))
        }
    }

    /// Build the backing store selected by this configuration.
    pub fn store(&self) -> Result<Arc<dyn FileStore>> {
        match self.backend {
            Backend::Local => {
                let directory = self.directory.as_ref().ok_or_else(|| {
                    Error::Configuration("no directory configured".to_string())
                })?;
                Ok(Arc::new(LocalStore::new(directory)?))
            }
            Backend::Memory => Ok(Arc::new(MemoryStore::new())),
        }
    }
}
