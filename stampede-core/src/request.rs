//! Request specifications produced by scenario tasks

use crate::check::ResponseCheck;
use serde_json::Value as JsonValue;
use stampede_http::{HttpMethod, HttpRequest, RequestBody};
use std::time::Duration;

/// Everything needed to send one request and judge its response
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    /// Path and query, relative to the target host
    pub path: String,
    /// Stats entry the request is recorded under
    pub name: String,
    pub body: Option<RequestBody>,
    pub timeout: Option<Duration>,
    pub check: ResponseCheck,
}

impl RequestSpec {
    /// A request recorded under its own path with the default check
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            method,
            name: path.clone(),
            path,
            body: None,
            timeout: None,
            check: ResponseCheck::Default,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Group the request under a stats name, e.g. `/products/[id]`
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn json(self, value: JsonValue) -> Self {
        self.body(RequestBody::Json(value))
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn check(mut self, check: ResponseCheck) -> Self {
        self.check = check;
        self
    }

    /// The wire request handed to the HTTP client
    pub fn to_http_request(&self) -> HttpRequest {
        HttpRequest {
            method: self.method,
            path: self.path.clone(),
            headers: Vec::new(),
            body: self.body.clone(),
            timeout: self.timeout,
        }
    }
}
