// src/storage/memory.rs
use std::collections::HashMap;
use std::io::Read;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use super::{FileStat, FileStore};
use crate::error::{Error, Result};

struct StoredFile {
    data: Vec<u8>,
    modified: DateTime<Utc>,
}

/// In-memory backend. Stands in where no disk or remote location is
/// configured and doubles as the upload target in tests.
pub struct MemoryStore {
    files: RwLock<HashMap<String, StoredFile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore { files: RwLock::new(HashMap::new()) }
    }

    pub fn with_file(self, name: &str, data: &[u8]) -> Self {
        self.insert(name, data);
        self
    }

    fn insert(&self, name: &str, data: &[u8]) {
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        files.insert(
            name.to_string(),
            StoredFile { data: data.to_vec(), modified: Utc::now() },
        );
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl FileStore for MemoryStore {
    fn list(&self) -> Result<Vec<String>> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        Ok(files
            .keys()
            .filter(|name| !name.starts_with('.'))
            .cloned()
            .collect())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        files
            .get(name)
            .map(|f| f.data.clone())
            .ok_or_else(|| Error::NotFound(format!("no such file: {}", name)))
    }

    fn write(&self, name: &str, reader: &mut dyn Read) -> Result<()> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.insert(name, &data);
        Ok(())
    }

    fn stat(&self, name: &str) -> Result<FileStat> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        files
            .get(name)
            .map(|f| FileStat { size: f.data.len() as u64, modified: Some(f.modified) })
            .ok_or_else(|| Error::NotFound(format!("no such file: {}", name)))
    }
}
