// src/reader/mod.rs
pub mod csv;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::http::{Request, Response};
use crate::identity::file_id;
use crate::storage::{sha256_hex, FileStore};

/// Structured file content as returned for json/yaml/csv files.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEnvelope {
    pub file_name: String,
    pub content: Value,
}

/// Reads one file from a store, answering conditional requests with 304
/// and decoding structured formats by extension.
pub struct FileReader<'a> {
    store: &'a dyn FileStore,
    delimiter: Option<String>,
}

impl<'a> FileReader<'a> {
    pub fn new(store: &'a dyn FileStore) -> Self {
        FileReader { store, delimiter: None }
    }

    pub fn with_delimiter(mut self, delimiter: Option<&str>) -> Self {
        self.delimiter = delimiter.map(|s| s.to_string());
        self
    }

    /// Resolve a public id back to a file name by applying the identity
    /// function to every listed entry. Directories are assumed small, no
    /// index is kept.
    pub fn resolve_id(&self, id: &str) -> Result<String> {
        for name in self.store.list()? {
            if file_id(&name) == id {
                return Ok(name);
            }
        }
        Err(Error::NotFound("provided id does not exist".to_string()))
    }

    pub fn read(&self, name: &str, request: &Request) -> Result<Response> {
        let stat = self.store.stat(name)?;
        let content = self.store.read(name)?;
        let checksum = sha256_hex(&content);

        if let Some(response) = self.check_conditional(request, &checksum, stat.modified) {
            debug!(file = name, "conditional request matched, responding 304");
            return Ok(self.with_validators(response, &checksum, stat.modified));
        }

        let response = match extension(name).as_str() {
            "json" => {
                let value: Value = serde_json::from_slice(&content).map_err(|e| {
                    Error::Configuration(format!("invalid json in {}: {}", name, e))
                })?;
                self.envelope(name, value)
            }
            "yml" | "yaml" => {
                let value: serde_yaml::Value =
                    serde_yaml::from_slice(&content).map_err(|e| {
                        Error::Configuration(format!("invalid yaml in {}: {}", name, e))
                    })?;
                let value = serde_json::to_value(value).map_err(|e| {
                    Error::Configuration(format!("yaml in {} is not representable: {}", name, e))
                })?;
                self.envelope(name, value)
            }
            "csv" => {
                let delimiter = csv::delimiter_or_default(self.delimiter.as_deref());
                let rows = csv::parse(&String::from_utf8_lossy(&content), delimiter);
                self.envelope(name, serde_json::to_value(rows).unwrap_or(Value::Null))
            }
            _ => {
                let content_type = self.store.content_type(name)?;
                Response::raw(200, &content_type, content)
            }
        };

        Ok(self.with_validators(response, &checksum, stat.modified))
    }

    fn envelope(&self, name: &str, content: Value) -> Response {
        Response::json(
            200,
            &FileEnvelope { file_name: name.to_string(), content },
        )
    }

    fn with_validators(
        &self,
        response: Response,
        checksum: &str,
        modified: Option<DateTime<Utc>>,
    ) -> Response {
        let response = response.with_header("ETag", &format!("\"{}\"", checksum));
        match modified {
            Some(modified) => response.with_header(
                "Last-Modified",
                &modified.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            ),
            None => response,
        }
    }

    /// Either validator can short-circuit to 304 on its own; when neither
    /// header is present the request goes straight to 200.
    fn check_conditional(
        &self,
        request: &Request,
        checksum: &str,
        modified: Option<DateTime<Utc>>,
    ) -> Option<Response> {
        if let Some(etag) = request.header("If-None-Match") {
            if etag.trim_matches('"') == checksum {
                return Some(Response::not_modified());
            }
        }

        if let (Some(since), Some(modified)) = (request.header("If-Modified-Since"), modified) {
            if let Some(since) = parse_http_date(since) {
                if since.timestamp() >= modified.timestamp() {
                    return Some(Response::not_modified());
                }
            }
        }

        None
    }
}

fn extension(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// HTTP-date (RFC2822) or RFC3339; anything else is ignored by the caller.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
