//! In-process stand-ins for the album, product and product search services

#![allow(dead_code)]

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use stampede_core::Product;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, Once, OnceLock};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

static INIT: Once = Once::new();

pub fn init_test_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_target(false)
            .without_time()
            .try_init();
    });
}

const BRANDS: [&str; 5] = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon"];
const CATEGORIES: [&str; 5] = ["Electronics", "Books", "Home", "Sports", "Clothing"];
const CATALOG_SIZE: usize = 1_000;
const SEARCH_SCAN_LIMIT: usize = 100;
const SEARCH_RESULT_LIMIT: usize = 20;

struct CatalogItem {
    id: usize,
    name: String,
    category: &'static str,
    brand: &'static str,
}

fn catalog() -> &'static [CatalogItem] {
    static CATALOG: OnceLock<Vec<CatalogItem>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        (0..CATALOG_SIZE)
            .map(|i| {
                let brand = BRANDS[i % BRANDS.len()];
                CatalogItem {
                    id: i + 1,
                    name: format!("Product {} {}", brand, i + 1),
                    category: CATEGORIES[i % CATEGORIES.len()],
                    brand,
                }
            })
            .collect()
    })
}

/// What the services saw, keyed by route
#[derive(Debug, Default)]
pub struct ServiceState {
    pub albums: Vec<Value>,
    pub products: HashMap<u32, Product>,
    pub hits: HashMap<&'static str, u64>,
    /// Product detail bodies that failed to parse or validate
    pub rejected_details: u64,
}

#[derive(Clone, Default)]
pub struct MockService {
    state: Arc<Mutex<ServiceState>>,
}

fn error_body(status: StatusCode, error: &str, message: &str, details: String) -> Response {
    (
        status,
        Json(json!({
            "error": error,
            "message": message,
            "details": details,
        })),
    )
        .into_response()
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate albums the way the real service ships with three records
    pub fn with_seed_albums(self) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for (id, title, artist, price) in [
                ("1", "Blue Train", "John Coltrane", 56.99),
                ("2", "Jeru", "Gerry Mulligan", 17.99),
                ("3", "Sarah Vaughan and Clifford Brown", "Sarah Vaughan", 39.99),
            ] {
                state.albums.push(json!({
                    "id": id,
                    "title": title,
                    "artist": artist,
                    "price": price,
                }));
            }
        }
        self
    }

    pub fn hits(&self, route: &str) -> u64 {
        self.state.lock().unwrap().hits.get(route).copied().unwrap_or(0)
    }

    pub fn with_state<T>(&self, f: impl FnOnce(&ServiceState) -> T) -> T {
        f(&self.state.lock().unwrap())
    }

    fn hit(&self, route: &'static str) {
        *self.state.lock().unwrap().hits.entry(route).or_insert(0) += 1;
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/albums", get(list_albums).post(create_album))
            .route("/products/search", get(search_products))
            .route("/products/{id}", get(get_product))
            .route("/products/{id}/details", post(add_product_details))
            .route("/health", get(health))
            .with_state(self.clone())
    }

    /// Serve on an ephemeral local port; returns the base URL
    pub async fn start(&self) -> Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let app = self.router();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start
        tokio::time::sleep(Duration::from_millis(50)).await;

        Ok(format!("http://{}", addr))
    }
}

/// A base URL nothing listens on
pub async fn closed_port_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{}", addr))
}

async fn list_albums(State(service): State<MockService>) -> Json<Value> {
    service.hit("GET /albums");
    Json(Value::Array(service.state.lock().unwrap().albums.clone()))
}

async fn create_album(State(service): State<MockService>, Json(album): Json<Value>) -> Response {
    service.hit("POST /albums");
    if album.get("title").and_then(Value::as_str).is_none() {
        return error_body(
            StatusCode::BAD_REQUEST,
            "INVALID_INPUT",
            "Invalid album",
            "title is required".to_string(),
        );
    }
    service.state.lock().unwrap().albums.push(album.clone());
    (StatusCode::CREATED, Json(album)).into_response()
}

fn parse_product_id(raw: &str) -> Result<u32, Response> {
    match raw.parse::<u32>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(error_body(
            StatusCode::BAD_REQUEST,
            "INVALID_INPUT",
            "Invalid product ID",
            "Product ID must be a positive integer".to_string(),
        )),
    }
}

async fn get_product(State(service): State<MockService>, Path(raw_id): Path<String>) -> Response {
    service.hit("GET /products/{id}");
    let id = match parse_product_id(&raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match service.state.lock().unwrap().products.get(&id) {
        Some(product) => (StatusCode::OK, Json(json!(product))).into_response(),
        None => error_body(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Product not found",
            format!("No product found with ID {}", id),
        ),
    }
}

fn validate_product(product: &Product) -> Option<&'static str> {
    if product.sku.is_empty() {
        return Some("sku is required");
    }
    if product.manufacturer.is_empty() {
        return Some("manufacturer is required");
    }
    if product.category_id < 1 {
        return Some("category_id must be a positive integer");
    }
    None
}

/// Accepts bodies with or without a JSON content type
async fn add_product_details(
    State(service): State<MockService>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Response {
    service.hit("POST /products/{id}/details");
    let id = match parse_product_id(&raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let reject = |status, error, message, details: String| {
        service.state.lock().unwrap().rejected_details += 1;
        error_body(status, error, message, details)
    };

    let product: Product = match serde_json::from_slice(&body) {
        Ok(product) => product,
        Err(e) => {
            return reject(
                StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                "Invalid JSON in request body",
                e.to_string(),
            )
        }
    };

    if product.product_id != id {
        return reject(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Product not found",
            format!(
                "product_id in body ({}) does not match path ({})",
                product.product_id, id
            ),
        );
    }
    if let Some(problem) = validate_product(&product) {
        return reject(
            StatusCode::BAD_REQUEST,
            "INVALID_INPUT",
            "The provided input data is invalid",
            problem.to_string(),
        );
    }

    service.state.lock().unwrap().products.insert(id, product);
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn search_products(
    State(service): State<MockService>,
    Query(params): Query<SearchParams>,
) -> Json<Value> {
    service.hit("GET /products/search");
    let started = Instant::now();
    let query = params.q.to_lowercase();

    let mut products = Vec::new();
    let mut total_found = 0;
    for item in catalog().iter().take(SEARCH_SCAN_LIMIT) {
        if item.name.to_lowercase().contains(&query)
            || item.category.to_lowercase().contains(&query)
        {
            total_found += 1;
            if products.len() < SEARCH_RESULT_LIMIT {
                products.push(json!({
                    "id": item.id,
                    "name": item.name,
                    "category": item.category,
                    "description": format!("Description for product {}", item.id),
                    "brand": item.brand,
                }));
            }
        }
    }

    Json(json!({
        "products": products,
        "total_found": total_found,
        "search_time": format!("{:?}", started.elapsed()),
    }))
}

async fn health(State(service): State<MockService>) -> &'static str {
    service.hit("GET /health");
    "ok"
}
