// src/storage/mod.rs
pub mod local;
pub mod memory;

pub use local::LocalStore;
pub use memory::MemoryStore;

use std::io::Read;

use sha2::{Digest, Sha256};

use crate::error::Result;

/// Metadata a backend can report for one file. `modified` is optional,
/// not every backend tracks it.
#[derive(Debug, Clone)]
pub struct FileStat {
    pub size: u64,
    pub modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// The backing store seen by every handler: a flat namespace of regular
/// files. One implementation per storage location, selected by
/// configuration.
pub trait FileStore: Send + Sync {
    /// Names of all non-hidden regular files, in no particular order.
    fn list(&self) -> Result<Vec<String>>;

    fn read(&self, name: &str) -> Result<Vec<u8>>;

    fn write(&self, name: &str, reader: &mut dyn Read) -> Result<()>;

    fn stat(&self, name: &str) -> Result<FileStat>;

    fn checksum(&self, name: &str) -> Result<String> {
        Ok(sha256_hex(&self.read(name)?))
    }

    fn content_type(&self, name: &str) -> Result<String> {
        Ok(content_type_for(name).to_string())
    }
}

pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// MIME guess from the file extension.
pub fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "md" | "log" => "text/plain",
        "json" => "application/json",
        "yaml" | "yml" => "application/yaml",
        "csv" => "text/csv",
        "xml" => "application/xml",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
