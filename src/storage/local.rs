// src/storage/local.rs
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileStat, FileStore};
use crate::error::{Error, Result};

/// One directory on disk. Listings are flat: no recursion, hidden files
/// and non-regular entries are skipped.
#[derive(Debug)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::Configuration(format!(
                "configured directory does not exist: {}",
                root.display()
            )));
        }
        Ok(LocalStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names are a flat namespace; anything that walks out of the root is
    /// rejected before touching the disk.
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name == ".." {
            return Err(Error::BadInput(format!("invalid file name: {}", name)));
        }
        Ok(self.root.join(name))
    }
}

impl FileStore for LocalStore {
    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root).max_depth(1) {
            let entry = entry.map_err(|e| {
                Error::Configuration(format!("unreadable directory: {}", e))
            })?;
            if entry.path() == self.root || !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve(name)?;
        if !path.is_file() {
            return Err(Error::NotFound(format!("no such file: {}", name)));
        }
        Ok(fs::read(path)?)
    }

    fn write(&self, name: &str, reader: &mut dyn Read) -> Result<()> {
        let path = self.resolve(name)?;
        let mut file = fs::File::create(path)?;
        std::io::copy(reader, &mut file)?;
        Ok(())
    }

    fn stat(&self, name: &str) -> Result<FileStat> {
        let path = self.resolve(name)?;
        if !path.is_file() {
            return Err(Error::NotFound(format!("no such file: {}", name)));
        }
        let metadata = fs::metadata(path)?;
        let modified = metadata
            .modified()
            .ok()
            .map(chrono::DateTime::<chrono::Utc>::from);
        Ok(FileStat { size: metadata.len(), modified })
    }
}
