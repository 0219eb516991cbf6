// src/http/request.rs
use std::collections::HashMap;

use crate::upload::UploadBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// Request body as handed over by the embedding program. The multipart
/// parser itself lives outside this crate; parts arrive already delineated.
#[derive(Debug)]
pub enum Payload {
    None,
    Json(serde_json::Value),
    Multipart(UploadBody),
}

/// A parsed request: method, path, merged query/route parameters, headers
/// and an optional payload. Header names are matched case-insensitively.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    params: HashMap<String, String>,
    headers: HashMap<String, String>,
    pub payload: Payload,
}

impl Request {
    pub fn new(method: Method, path: &str) -> Self {
        Request {
            method,
            path: path.to_string(),
            params: HashMap::new(),
            headers: HashMap::new(),
            payload: Payload::None,
        }
    }

    pub fn get(path: &str) -> Self {
        Request::new(Method::Get, path)
    }

    pub fn post(path: &str) -> Self {
        Request::new(Method::Post, path)
    }

    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_lowercase(), value.to_string());
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    /// Route dispatch fills captured path segments in here as well.
    pub fn set_param(&mut self, name: &str, value: &str) {
        self.params.insert(name.to_string(), value.to_string());
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }
}
