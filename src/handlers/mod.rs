// src/handlers/mod.rs
pub mod router;

pub use router::{Registry, Router};

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;

use crate::config::Config;
use crate::directory::{DirectoryLister, ListQuery};
use crate::error::{Error, Result};
use crate::http::{Method, Payload, Request, Response};
use crate::reader::FileReader;
use crate::storage::{FileStore, LocalStore};
use crate::upload::UploadReceiver;

/// One operation of the service. Handlers are registered in a [`Registry`]
/// under their operation name and invoked by the router.
pub trait Handler: Send + Sync {
    fn handle(&self, request: &Request) -> Result<Response>;
}

/// GET `/` — the listing operation.
pub struct DirectoryIndex {
    store: Arc<dyn FileStore>,
}

impl DirectoryIndex {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        DirectoryIndex { store }
    }
}

impl Handler for DirectoryIndex {
    fn handle(&self, request: &Request) -> Result<Response> {
        let query = ListQuery::from_request(request);
        let page = DirectoryLister::new(self.store.as_ref()).list(&query)?;
        Ok(Response::json(200, &page))
    }
}

/// GET `/:id` — resolve an id to a file and serve it.
pub struct DirectoryDetail {
    store: Arc<dyn FileStore>,
    delimiter: Option<String>,
}

impl DirectoryDetail {
    pub fn new(store: Arc<dyn FileStore>, delimiter: Option<String>) -> Self {
        DirectoryDetail { store, delimiter }
    }
}

impl Handler for DirectoryDetail {
    fn handle(&self, request: &Request) -> Result<Response> {
        let id = request
            .param("id")
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::BadInput("no id provided".to_string()))?;

        let reader = FileReader::new(self.store.as_ref())
            .with_delimiter(self.delimiter.as_deref());
        let name = reader.resolve_id(id)?;
        reader.read(&name, request)
    }
}

/// POST `/` — multipart upload into the backing store.
pub struct DirectoryUpload {
    store: Arc<dyn FileStore>,
}

impl DirectoryUpload {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        DirectoryUpload { store }
    }
}

impl Handler for DirectoryUpload {
    fn handle(&self, request: &Request) -> Result<Response> {
        let body = match &request.payload {
            Payload::Multipart(body) => body,
            _ => {
                return Err(Error::BadInput(
                    "request must be a multipart form upload".to_string(),
                ))
            }
        };

        UploadReceiver::new(self.store.as_ref()).receive(body)?;

        Ok(Response::json(
            201,
            &json!({
                "success": true,
                "message": "file successfully uploaded",
            }),
        ))
    }
}

/// Serves one explicitly configured file, independent of any listing.
pub struct FileGet {
    path: PathBuf,
    delimiter: Option<String>,
}

impl FileGet {
    pub fn new(path: impl Into<PathBuf>, delimiter: Option<String>) -> Self {
        FileGet { path: path.into(), delimiter }
    }
}

impl Handler for FileGet {
    fn handle(&self, request: &Request) -> Result<Response> {
        let parent = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let name = self.path.file_name().map(|n| n.to_string_lossy().to_string());
        let (parent, name) = match (parent, name) {
            (Some(parent), Some(name)) => (parent, name),
            _ => {
                return Err(Error::Configuration(format!(
                    "configured file does not exist: {}",
                    self.path.display()
                )))
            }
        };

        let store = LocalStore::new(parent)?;
        FileReader::new(&store)
            .with_delimiter(self.delimiter.as_deref())
            .read(&name, request)
            .map_err(|err| match err {
                // a missing configured file is a setup fault, not a 404
                Error::NotFound(_) => Error::Configuration(format!(
                    "configured file does not exist: {}",
                    self.path.display()
                )),
                other => other,
            })
    }
}

/// Standard operation table for one configured location: listing, detail
/// and upload over the store, plus the single-file operation when a file
/// path is configured.
pub fn directory_service(config: &Config) -> Result<Router> {
    let store = config.store()?;
    let delimiter = config.delimiter.clone();

    let mut registry = Registry::new();
    registry.register("directory.index", Box::new(DirectoryIndex::new(store.clone())));
    registry.register(
        "directory.detail",
        Box::new(DirectoryDetail::new(store.clone(), delimiter.clone())),
    );
    registry.register("directory.upload", Box::new(DirectoryUpload::new(store)));

    let mut router = Router::new(registry)
        .route(Method::Get, "/", "directory.index")
        .route(Method::Post, "/", "directory.upload");

    // "/file" must be registered ahead of "/:id", the first match wins.
    if let Some(file) = &config.file {
        router
            .registry_mut()
            .register("file.get", Box::new(FileGet::new(file, delimiter)));
        router = router.route(Method::Get, "/file", "file.get");
    }

    Ok(router.route(Method::Get, "/:id", "directory.detail"))
}
