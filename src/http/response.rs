// src/http/response.rs
use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

/// Response body: structured JSON, raw bytes with an explicit content type,
/// or nothing (304).
#[derive(Debug, PartialEq)]
pub enum Body {
    Json(Value),
    Raw { content_type: String, data: Vec<u8> },
    Empty,
}

#[derive(Debug)]
pub struct Response {
    pub status: u16,
    headers: Vec<(String, String)>,
    pub body: Body,
}

impl Response {
    pub fn json<T: Serialize>(status: u16, value: &T) -> Response {
        match serde_json::to_value(value) {
            Ok(value) => Response { status, headers: Vec::new(), body: Body::Json(value) },
            // a body that cannot be serialized must not pose as a success
            Err(_) => Response { status: 500, headers: Vec::new(), body: Body::Empty },
        }
    }

    pub fn raw(status: u16, content_type: &str, data: Vec<u8>) -> Response {
        Response {
            status,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body: Body::Raw { content_type: content_type.to_string(), data },
        }
    }

    pub fn not_modified() -> Response {
        Response { status: 304, headers: Vec::new(), body: Body::Empty }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Response {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// JSON view of the body for assertions and JSON-over-the-wire hosts.
    pub fn body_json(&self) -> Option<&Value> {
        match &self.body {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&Error> for Response {
    fn from(err: &Error) -> Response {
        Response::json(
            err.status_code(),
            &serde_json::json!({
                "success": false,
                "message": err.to_string(),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = Error::NotFound("provided id does not exist".to_string());
        let response = Response::from(&err);
        assert_eq!(response.status, 404);
        let body = response.body_json().unwrap();
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("not found"));
    }

    #[test]
    fn test_unserializable_body_becomes_500() {
        // tuple keys cannot become JSON object keys
        let mut map = std::collections::HashMap::new();
        map.insert((1, 2), "x");
        let response = Response::json(200, &map);
        assert_eq!(response.status, 500);
        assert_eq!(response.body, Body::Empty);
    }

    #[test]
    fn test_header_lookup() {
        let response = Response::not_modified().with_header("ETag", "\"abc\"");
        assert_eq!(response.header("etag"), Some("\"abc\""));
        assert_eq!(response.header("Last-Modified"), None);
    }
}
