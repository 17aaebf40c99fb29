//! The scenario abstraction and the registry of built-in scenarios

use crate::error::ScenarioError;
use crate::request::RequestSpec;
use crate::task::TaskSet;
use crate::wait::WaitTime;
use rand::rngs::StdRng;
use serde::Serialize;
use stampede_config::ScenariosConfig;
use std::fmt;
use std::str::FromStr;

/// What a simulated user does
pub trait Scenario: Send + Sync + Sized + 'static {
    /// Identifier used on the command line and in reports
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Pause between two tasks of the same user
    fn wait_time(&self) -> WaitTime;

    fn tasks(&self) -> &TaskSet<Self>;

    /// Requests each user sends once, in order, before its first task
    fn on_start(&self, _rng: &mut StdRng) -> Vec<RequestSpec> {
        Vec::new()
    }

    fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            name: self.name().to_string(),
            description: self.description().to_string(),
            wait_time: self.wait_time().to_string(),
            tasks: self
                .tasks()
                .weights()
                .into_iter()
                .map(|(name, weight)| (name.to_string(), weight))
                .collect(),
        }
    }
}

/// Printable description of a scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub description: String,
    pub wait_time: String,
    pub tasks: Vec<(String, u32)>,
}

/// Built-in scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioKind {
    Album,
    Product,
    ProductSearch,
}

impl ScenarioKind {
    pub fn all() -> &'static [ScenarioKind] {
        &[
            ScenarioKind::Album,
            ScenarioKind::Product,
            ScenarioKind::ProductSearch,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioKind::Album => "album",
            ScenarioKind::Product => "product",
            ScenarioKind::ProductSearch => "product-search",
        }
    }

    /// Describe the scenario as it would run with `config`
    pub fn summary(&self, config: &ScenariosConfig) -> ScenarioSummary {
        use crate::scenarios::{AlbumScenario, ProductScenario, ProductSearchScenario};

        match self {
            ScenarioKind::Album => AlbumScenario::new().summary(),
            ScenarioKind::Product => ProductScenario::from_config(&config.product).summary(),
            ScenarioKind::ProductSearch => {
                ProductSearchScenario::from_config(&config.search).summary()
            }
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "album" | "albums" => Ok(ScenarioKind::Album),
            "product" | "products" => Ok(ScenarioKind::Product),
            "product-search" | "search" => Ok(ScenarioKind::ProductSearch),
            _ => Err(ScenarioError::UnknownScenario(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_kind_from_str() {
        assert_eq!("album".parse::<ScenarioKind>().unwrap(), ScenarioKind::Album);
        assert_eq!("Product".parse::<ScenarioKind>().unwrap(), ScenarioKind::Product);
        assert_eq!(
            "product_search".parse::<ScenarioKind>().unwrap(),
            ScenarioKind::ProductSearch
        );
        assert_eq!(
            "checkout".parse::<ScenarioKind>(),
            Err(ScenarioError::UnknownScenario("checkout".to_string()))
        );
    }

    #[test]
    fn test_scenario_kind_display_parses_back() {
        for kind in ScenarioKind::all() {
            assert_eq!(kind.to_string().parse::<ScenarioKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_summaries_match_task_ratios() {
        let config = ScenariosConfig::default();

        let album = ScenarioKind::Album.summary(&config);
        assert_eq!(
            album.tasks,
            vec![("get_albums".to_string(), 3), ("post_album".to_string(), 1)]
        );
        assert_eq!(album.wait_time, "1s-2s");

        let product = ScenarioKind::Product.summary(&config);
        assert_eq!(
            product.tasks,
            vec![("get_product".to_string(), 3), ("create_product".to_string(), 1)]
        );

        let search = ScenarioKind::ProductSearch.summary(&config);
        assert_eq!(
            search.tasks,
            vec![("search_products".to_string(), 10), ("health_check".to_string(), 1)]
        );
    }
}
