// src/handlers/router.rs
use std::collections::HashMap;

use tracing::debug;

use super::Handler;
use crate::http::{Method, Request, Response};

/// Handler table keyed by operation name.
pub struct Registry {
    handlers: HashMap<String, Box<dyn Handler>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry { handlers: HashMap::new() }
    }

    pub fn register(&mut self, operation: &str, handler: Box<dyn Handler>) {
        self.handlers.insert(operation.to_string(), handler);
    }

    pub fn get(&self, operation: &str) -> Option<&dyn Handler> {
        self.handlers.get(operation).map(|h| h.as_ref())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

struct Route {
    method: Method,
    pattern: String,
    operation: String,
}

/// Minimal router: matches method plus path pattern, fills `:name`
/// captures into the request parameters and dispatches into the registry.
/// Routes are tried in registration order, first match wins.
pub struct Router {
    registry: Registry,
    routes: Vec<Route>,
}

impl Router {
    pub fn new(registry: Registry) -> Self {
        Router { registry, routes: Vec::new() }
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn route(mut self, method: Method, pattern: &str, operation: &str) -> Self {
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            operation: operation.to_string(),
        });
        self
    }

    pub fn dispatch(&self, mut request: Request) -> Response {
        for route in &self.routes {
            if route.method != request.method {
                continue;
            }
            let captures = match match_path(&route.pattern, &request.path) {
                Some(captures) => captures,
                None => continue,
            };

            debug!(operation = %route.operation, path = %request.path, "dispatch");
            for (name, value) in captures {
                request.set_param(&name, &value);
            }

            let handler = match self.registry.get(&route.operation) {
                Some(handler) => handler,
                None => continue,
            };

            return match handler.handle(&request) {
                Ok(response) => response,
                Err(err) => Response::from(&err),
            };
        }

        Response::json(
            404,
            &serde_json::json!({
                "success": false,
                "message": "no operation matches the request",
            }),
        )
    }
}

/// Match a pattern like `/:id` against a path, returning captured segments.
fn match_path(pattern: &str, path: &str) -> Option<Vec<(String, String)>> {
    let pattern_segments: Vec<&str> = pattern.trim_matches('/').split('/').collect();
    let path_segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut captures = Vec::new();
    for (pattern_segment, path_segment) in pattern_segments.iter().zip(&path_segments) {
        if let Some(name) = pattern_segment.strip_prefix(':') {
            if path_segment.is_empty() {
                return None;
            }
            captures.push((name.to_string(), path_segment.to_string()));
        } else if pattern_segment != path_segment {
            return None;
        }
    }

    Some(captures)
}
