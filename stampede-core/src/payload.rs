//! Synthetic request payloads

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

/// Album record posted by the album scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub price: f64,
}

impl Album {
    /// The fixed album every `POST /albums` sends
    pub fn sample() -> Self {
        Self {
            id: "4".to_string(),
            title: "Test Album".to_string(),
            artist: "Test Artist".to_string(),
            price: 29.99,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        json!(self)
    }
}

/// Product record posted to `/products/{id}/details`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: u32,
    pub sku: String,
    pub manufacturer: String,
    pub category_id: u32,
    pub weight: u32,
    pub some_other_id: u32,
}

impl Product {
    /// A product for `product_id` with randomized category, weight and
    /// secondary id
    pub fn random<R: Rng + ?Sized>(product_id: u32, rng: &mut R) -> Self {
        Self {
            product_id,
            sku: format!("SKU-{:05}", product_id),
            manufacturer: format!("Manufacturer-{}", product_id),
            category_id: rng.random_range(1..=100),
            weight: rng.random_range(100..=5000),
            some_other_id: rng.random_range(1..=1000),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        json!(self)
    }
}
