// src/upload/mod.rs
use std::fs::File;
use std::path::PathBuf;

use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::storage::FileStore;

/// Where a part's bytes live until they are written to the store. The host
/// usually spools uploads to temp files; in-memory parts exist for embedders
/// that already hold the bytes.
#[derive(Debug)]
pub enum PartSource {
    TempFile(PathBuf),
    Memory(Vec<u8>),
}

/// One file part of a multipart body, as delineated by the host's parser.
#[derive(Debug)]
pub struct UploadPart {
    pub name: String,
    /// Transport-level error reported by the parser, if any.
    pub error: Option<String>,
    pub source: PartSource,
}

impl UploadPart {
    pub fn from_bytes(name: &str, data: &[u8]) -> Self {
        UploadPart {
            name: name.to_string(),
            error: None,
            source: PartSource::Memory(data.to_vec()),
        }
    }

    pub fn from_temp_file(name: &str, path: impl Into<PathBuf>) -> Self {
        UploadPart {
            name: name.to_string(),
            error: None,
            source: PartSource::TempFile(path.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct UploadBody {
    pub parts: Vec<UploadPart>,
}

impl UploadBody {
    pub fn new(parts: Vec<UploadPart>) -> Self {
        UploadBody { parts }
    }
}

/// Writes uploaded parts to the backing store under their validated names.
/// The request fails on the first bad part; writes already performed are
/// not rolled back.
pub struct UploadReceiver<'a> {
    store: &'a dyn FileStore,
    name_pattern: Regex,
}

impl<'a> UploadReceiver<'a> {
    pub fn new(store: &'a dyn FileStore) -> Self {
        UploadReceiver {
            store,
            name_pattern: Regex::new(r"^[A-Za-z0-9\-_.]{3,64}$").unwrap(),
        }
    }

    pub fn receive(&self, body: &UploadBody) -> Result<()> {
        for part in &body.parts {
            self.validate(part)?;
            self.write(part)?;
            debug!(file = %part.name, "upload stored");
        }
        Ok(())
    }

    /// All checks run before the part's write starts.
    fn validate(&self, part: &UploadPart) -> Result<()> {
        if let Some(error) = &part.error {
            return Err(Error::BadInput(format!(
                "there was an error with the file upload: {}",
                error
            )));
        }
        if part.name.is_empty() {
            return Err(Error::BadInput("provided no file name".to_string()));
        }
        if !self.name_pattern.is_match(&part.name) {
            return Err(Error::BadInput(
                "provided file name contains invalid characters".to_string(),
            ));
        }
        if let PartSource::TempFile(path) = &part.source {
            if !path.is_file() {
                return Err(Error::BadInput("could not find uploaded file".to_string()));
            }
        }
        Ok(())
    }

    fn write(&self, part: &UploadPart) -> Result<()> {
        match &part.source {
            PartSource::TempFile(path) => {
                let mut file = File::open(path)
                    .map_err(|_| Error::BadInput("could not read uploaded file".to_string()))?;
                self.store.write(&part.name, &mut file)
            }
            PartSource::Memory(data) => {
                let mut reader: &[u8] = data;
                self.store.write(&part.name, &mut reader)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::io::Write;

    #[test]
    fn test_valid_upload_is_written() {
        let store = MemoryStore::new();
        let receiver = UploadReceiver::new(&store);
        let body = UploadBody::new(vec![UploadPart::from_bytes("report-1.csv", b"a;b")]);
        receiver.receive(&body).unwrap();
        assert_eq!(store.read("report-1.csv").unwrap(), b"a;b");
    }

    #[test]
    fn test_upload_from_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join("upload-src");
        File::create(&tmp).unwrap().write_all(b"payload").unwrap();

        let store = MemoryStore::new();
        let receiver = UploadReceiver::new(&store);
        let body = UploadBody::new(vec![UploadPart::from_temp_file("data.bin", &tmp)]);
        receiver.receive(&body).unwrap();
        assert_eq!(store.read("data.bin").unwrap(), b"payload");
    }

    #[test]
    fn test_invalid_name_is_rejected_before_write() {
        let store = MemoryStore::new();
        let receiver = UploadReceiver::new(&store);
        for name in ["ab", "has space.txt", "sub/dir.txt", "../../evil", ""] {
            let body = UploadBody::new(vec![UploadPart::from_bytes(name, b"x")]);
            let err = receiver.receive(&body).unwrap_err();
            assert!(matches!(err, Error::BadInput(_)), "name {:?}", name);
        }
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_name_length_bounds() {
        let store = MemoryStore::new();
        let receiver = UploadReceiver::new(&store);
        let long = "a".repeat(65);
        let body = UploadBody::new(vec![UploadPart::from_bytes(&long, b"x")]);
        assert!(receiver.receive(&body).is_err());

        let max = "a".repeat(64);
        let body = UploadBody::new(vec![UploadPart::from_bytes(&max, b"x")]);
        assert!(receiver.receive(&body).is_ok());
    }

    #[test]
    fn test_part_error_fails_the_request() {
        let store = MemoryStore::new();
        let receiver = UploadReceiver::new(&store);
        let part = UploadPart {
            name: "fine.txt".to_string(),
            error: Some("partial upload".to_string()),
            source: PartSource::Memory(vec![]),
        };
        let err = receiver.receive(&UploadBody::new(vec![part])).unwrap_err();
        assert!(matches!(err, Error::BadInput(_)));
    }

    #[test]
    fn test_missing_temp_file_is_rejected() {
        let store = MemoryStore::new();
        let receiver = UploadReceiver::new(&store);
        let body = UploadBody::new(vec![UploadPart::from_temp_file(
            "data.bin",
            "/no/such/tmp/file",
        )]);
        assert!(matches!(receiver.receive(&body), Err(Error::BadInput(_))));
    }

    #[test]
    fn test_earlier_writes_are_kept_when_a_later_part_fails() {
        let store = MemoryStore::new();
        let receiver = UploadReceiver::new(&store);
        let body = UploadBody::new(vec![
            UploadPart::from_bytes("good.txt", b"kept"),
            UploadPart::from_bytes("bad name!", b"never written"),
        ]);
        assert!(receiver.receive(&body).is_err());
        assert_eq!(store.read("good.txt").unwrap(), b"kept");
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
