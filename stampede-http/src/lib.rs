//! HTTP client functionality for Stampede
//!
//! This crate provides the client simulated users send their requests
//! through: a pooled reqwest client resolved against the target host, with
//! an offline mode that answers from registered mocks.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;

// Re-export main types for convenience
pub use client::{HttpClient, HttpManager, MockResponse};
pub use config::HttpConfig;
pub use errors::HttpError;
pub use types::{HttpMethod, HttpMethodError, HttpRequest, HttpResponse, RequestBody};
