//! HTTP client implementation

use crate::config::HttpConfig;
use crate::errors::HttpError;
use crate::types::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use reqwest::{
    header::{HeaderName, HeaderValue, CONTENT_TYPE},
    Client,
};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, trace};
use url::Url;

/// HTTP client trait simulated users send requests through
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a request and read the whole response body
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Canned response served in offline mode
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl MockResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &JsonValue) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn empty(status: u16) -> Self {
        Self::new(status, Vec::new())
    }
}

/// HTTP Manager for handling HTTP requests with mock support
///
/// One manager is shared by every simulated user in a run so they draw
/// from the same connection pool.
#[derive(Debug, Clone)]
pub struct HttpManager {
    base_url: String,
    client: Client,
    offline: bool,
    mocks: HashMap<(HttpMethod, String), MockResponse>,
}

impl HttpManager {
    /// Create a manager for `base_url` with default configuration
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Self::with_config(base_url, HttpConfig::default())
    }

    /// Create a manager for `base_url` with specific configuration
    pub fn with_config(base_url: &str, config: HttpConfig) -> Result<Self, HttpError> {
        let parsed = Url::parse(base_url).map_err(|e| HttpError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HttpError::InvalidUrl(format!(
                "{}: only http and https hosts are supported",
                base_url
            )));
        }

        debug!(
            "Creating HttpManager for {} with timeout: {:?}",
            base_url, config.timeout
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .redirect(reqwest::redirect::Policy::limited(
                config.max_redirects as usize,
            ))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            offline: false,
            mocks: HashMap::new(),
        })
    }

    /// Set offline mode
    pub fn set_offline(&mut self) {
        self.offline = true;
        debug!("HttpManager set to offline mode");
    }

    /// Add a single HTTP mock
    ///
    /// `path` matches exactly, or as a prefix when no exact mock exists
    /// (the longest matching prefix wins).
    pub fn add_mock(&mut self, method: HttpMethod, path: &str, response: MockResponse) {
        self.mocks.insert((method, path.to_string()), response);
        debug!("Added HTTP mock for {} {}", method, path);
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a request path against the base URL
    pub fn resolve(&self, path: &str) -> Result<Url, HttpError> {
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        Url::parse(&joined).map_err(|e| HttpError::InvalidUrl(format!("{}: {}", joined, e)))
    }

    fn mock_response(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let exact = self.mocks.get(&(request.method, request.path.clone()));

        let mock = exact.or_else(|| {
            self.mocks
                .iter()
                .filter(|((method, path), _)| {
                    *method == request.method && request.path.starts_with(path.as_str())
                })
                .max_by_key(|((_, path), _)| path.len())
                .map(|(_, response)| response)
        });

        match mock {
            Some(mock) => {
                trace!("Serving mock response for {} {}", request.method, request.path);
                Ok(HttpResponse::new(mock.status, mock.body.clone()))
            }
            None => Err(HttpError::NoMock {
                method: request.method.to_string(),
                path: request.path.clone(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl HttpClient for HttpManager {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        if self.offline {
            return self.mock_response(request);
        }

        let url = self.resolve(&request.path)?;
        trace!("Building {} request to {}", request.method, url);

        let mut builder = self.client.request(request.method.into(), url);

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        for (name, value) in &request.headers {
            let invalid = || HttpError::InvalidHeader {
                name: name.clone(),
                value: value.clone(),
            };
            let header_name = HeaderName::from_str(name).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            builder = builder.header(header_name, header_value);
        }

        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Raw {
                content_type,
                bytes,
            }) => {
                let header_value =
                    HeaderValue::from_str(content_type).map_err(|_| HttpError::InvalidHeader {
                        name: CONTENT_TYPE.to_string(),
                        value: content_type.clone(),
                    })?;
                builder.header(CONTENT_TYPE, header_value).body(bytes.clone())
            }
            None => builder,
        };

        let start = Instant::now();
        let response = builder.send().await?;
        let status = response.status().as_u16();

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect();

        let body = response.bytes().await?.to_vec();
        let elapsed = start.elapsed();

        trace!(
            "HTTP response received: {} {} -> {} ({} bytes in {:?})",
            request.method,
            request.path,
            status,
            body.len(),
            elapsed
        );

        Ok(HttpResponse {
            status,
            headers,
            body,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn offline_manager() -> HttpManager {
        let mut manager = HttpManager::new("http://localhost:8080").unwrap();
        manager.set_offline();
        manager
    }

    #[test]
    fn test_rejects_non_http_hosts() {
        assert!(matches!(
            HttpManager::new("ftp://localhost"),
            Err(HttpError::InvalidUrl(_))
        ));
        assert!(matches!(HttpManager::new("localhost"), Err(HttpError::InvalidUrl(_))));
    }

    #[test]
    fn test_resolve_appends_path_to_base() {
        let manager = HttpManager::new("http://localhost:8080/api/").unwrap();
        assert_eq!(manager.base_url(), "http://localhost:8080/api");
        assert_eq!(
            manager.resolve("/products/search?q=books").unwrap().as_str(),
            "http://localhost:8080/api/products/search?q=books"
        );
        assert_eq!(
            manager.resolve("health").unwrap().as_str(),
            "http://localhost:8080/api/health"
        );
    }

    #[tokio::test]
    async fn test_offline_exact_mock() {
        let mut manager = offline_manager();
        manager.add_mock(
            HttpMethod::Get,
            "/health",
            MockResponse::json(200, &json!({"status": "healthy"})),
        );

        let response = manager.send(&HttpRequest::get("/health")).await.unwrap();
        assert_eq!(response.status, 200);
        let body: JsonValue = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_offline_longest_prefix_wins() {
        let mut manager = offline_manager();
        manager.add_mock(HttpMethod::Get, "/products/", MockResponse::empty(404));
        manager.add_mock(
            HttpMethod::Get,
            "/products/search",
            MockResponse::json(200, &json!({"products": [], "total_found": 0})),
        );

        let search = manager
            .send(&HttpRequest::get("/products/search?q=books"))
            .await
            .unwrap();
        assert_eq!(search.status, 200);

        let product = manager.send(&HttpRequest::get("/products/17")).await.unwrap();
        assert_eq!(product.status, 404);
    }

    #[tokio::test]
    async fn test_offline_mock_is_method_specific() {
        let mut manager = offline_manager();
        manager.add_mock(HttpMethod::Get, "/albums", MockResponse::json(200, &json!([])));

        let err = manager.send(&HttpRequest::post("/albums")).await.unwrap_err();
        assert!(matches!(err, HttpError::NoMock { .. }));
        assert_eq!(err.to_string(), "No mock response for POST /albums in offline mode");
    }

    #[tokio::test]
    async fn test_invalid_header_is_rejected_before_sending() {
        let manager = HttpManager::new("http://127.0.0.1:9").unwrap();
        let request = HttpRequest::get("/health").with_header("bad header", "x");

        let err = manager.send(&request).await.unwrap_err();
        assert!(matches!(err, HttpError::InvalidHeader { .. }));
    }
}
