//! Product service: seeds a fixed id range, then reads and rewrites it

use crate::payload::Product;
use crate::request::RequestSpec;
use crate::scenario::Scenario;
use crate::task::{Task, TaskSet};
use crate::wait::WaitTime;
use rand::rngs::StdRng;
use rand::Rng;
use stampede_config::{BodyEncoding, ProductScenarioConfig};
use stampede_http::RequestBody;

/// Reads products three times as often as it posts product details
///
/// Every user first posts details for ids `1..=product_count` so reads do
/// not hit missing products.
#[derive(Debug, Clone)]
pub struct ProductScenario {
    product_count: u32,
    encoding: BodyEncoding,
    tasks: TaskSet<Self>,
}

impl ProductScenario {
    pub fn new(product_count: u32, encoding: BodyEncoding) -> Self {
        Self {
            product_count: product_count.max(1),
            encoding,
            tasks: TaskSet::new(vec![
                Task::new("get_product", 3, Self::get_product),
                Task::new("create_product", 1, Self::create_product),
            ]),
        }
    }

    pub fn from_config(config: &ProductScenarioConfig) -> Self {
        Self::new(config.product_count, config.body_encoding)
    }

    pub fn product_count(&self) -> u32 {
        self.product_count
    }

    fn random_product_id(&self, rng: &mut StdRng) -> u32 {
        rng.random_range(1..=self.product_count)
    }

    fn details_request(&self, product_id: u32, rng: &mut StdRng) -> RequestSpec {
        let payload = Product::random(product_id, rng).to_json();
        let body = match self.encoding {
            BodyEncoding::Json => RequestBody::Json(payload),
            BodyEncoding::Raw => RequestBody::raw_json(&payload),
        };
        RequestSpec::post(format!("/products/{}/details", product_id)).body(body)
    }

    fn get_product(&self, rng: &mut StdRng) -> RequestSpec {
        let product_id = self.random_product_id(rng);
        RequestSpec::get(format!("/products/{}", product_id)).named("/products/[id]")
    }

    fn create_product(&self, rng: &mut StdRng) -> RequestSpec {
        let product_id = self.random_product_id(rng);
        self.details_request(product_id, rng)
            .named("/products/[id]/details")
    }
}

impl Default for ProductScenario {
    fn default() -> Self {
        Self::from_config(&ProductScenarioConfig::default())
    }
}

impl Scenario for ProductScenario {
    fn name(&self) -> &'static str {
        "product"
    }

    fn description(&self) -> &'static str {
        "GET /products/{id} and POST /products/{id}/details in a 3:1 ratio after seeding"
    }

    fn wait_time(&self) -> WaitTime {
        WaitTime::between_secs(1.0, 3.0)
    }

    fn tasks(&self) -> &TaskSet<Self> {
        &self.tasks
    }

    fn on_start(&self, rng: &mut StdRng) -> Vec<RequestSpec> {
        (1..=self.product_count)
            .map(|product_id| {
                self.details_request(product_id, rng)
                    .named("/products/[id]/details (setup)")
            })
            .collect()
    }
}
