// src/lib.rs
//! Expose a backing store (a directory on disk or an in-memory store)
//! through a small set of request handlers: paginated listings with stable
//! per-file ids, conditional single-file reads with format decoding, and
//! multipart uploads.

pub mod config;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod http;
pub mod identity;
pub mod reader;
pub mod storage;
pub mod upload;

pub use config::{Backend, Config};
pub use directory::{DirectoryLister, Entry, ListQuery, ListingPage};
pub use error::{Error, Result};
pub use handlers::{directory_service, Handler, Registry, Router};
pub use http::{Method, Payload, Request, Response};
pub use reader::FileReader;
pub use storage::{FileStore, LocalStore, MemoryStore};
pub use upload::{UploadBody, UploadPart, UploadReceiver};
