//! Product search service: hammer the search endpoint, poll health now and then

use crate::check::ResponseCheck;
use crate::request::RequestSpec;
use crate::scenario::Scenario;
use crate::task::{Task, TaskSet};
use crate::wait::WaitTime;
use rand::rngs::StdRng;
use rand::Rng;
use stampede_config::SearchScenarioConfig;
use std::time::Duration;
use url::form_urlencoded;

pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Fields a search response must carry
pub const SEARCH_RESPONSE_FIELDS: [&str; 2] = ["products", "total_found"];

/// Searches ten times as often as it checks health, with very short think time
#[derive(Debug, Clone)]
pub struct ProductSearchScenario {
    terms: Vec<String>,
    tasks: TaskSet<Self>,
}

impl ProductSearchScenario {
    pub fn new(terms: Vec<String>) -> Self {
        let terms = if terms.is_empty() {
            SearchScenarioConfig::default().terms
        } else {
            terms
        };

        Self {
            terms,
            tasks: TaskSet::new(vec![
                Task::new("search_products", 10, Self::search_products),
                Task::new("health_check", 1, Self::health_check),
            ]),
        }
    }

    pub fn from_config(config: &SearchScenarioConfig) -> Self {
        Self::new(config.terms.clone())
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    fn search_products(&self, rng: &mut StdRng) -> RequestSpec {
        let term = &self.terms[rng.random_range(0..self.terms.len())];
        let encoded: String = form_urlencoded::byte_serialize(term.as_bytes()).collect();

        RequestSpec::get(format!("/products/search?q={}", encoded))
            .named("GET /products/search")
            .timeout(SEARCH_TIMEOUT)
            .check(ResponseCheck::json_fields(200, SEARCH_RESPONSE_FIELDS))
    }

    fn health_check(&self, _rng: &mut StdRng) -> RequestSpec {
        RequestSpec::get("/health")
            .named("GET /health")
            .timeout(HEALTH_TIMEOUT)
    }
}

impl Default for ProductSearchScenario {
    fn default() -> Self {
        Self::from_config(&SearchScenarioConfig::default())
    }
}

impl Scenario for ProductSearchScenario {
    fn name(&self) -> &'static str {
        "product-search"
    }

    fn description(&self) -> &'static str {
        "GET /products/search?q=<term> and GET /health in a 10:1 ratio"
    }

    fn wait_time(&self) -> WaitTime {
        WaitTime::between_secs(0.01, 0.05)
    }

    fn tasks(&self) -> &TaskSet<Self> {
        &self.tasks
    }
}
