// src/http/mod.rs
pub mod request;
pub mod response;

pub use request::{Method, Payload, Request};
pub use response::{Body, Response};
