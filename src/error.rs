// src/error.rs
use std::io;

/// Errors surfaced by handlers and the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid root, missing configured file, bad backend setup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An id or name did not resolve to a file.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed request input (missing id, bad upload name, wrong payload).
    #[error("bad request: {0}")]
    BadInput(String),

    /// Backend I/O failure.
    #[error("storage error: {0}")]
    Storage(#[from] io::Error),
}

impl Error {
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Configuration(_) => 500,
            Error::NotFound(_) => 404,
            Error::BadInput(_) => 400,
            Error::Storage(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::Configuration("x".into()).status_code(), 500);
        assert_eq!(Error::NotFound("x".into()).status_code(), 404);
        assert_eq!(Error::BadInput("x".into()).status_code(), 400);
        let io = io::Error::new(io::ErrorKind::Other, "boom");
        assert_eq!(Error::Storage(io).status_code(), 500);
    }
}
