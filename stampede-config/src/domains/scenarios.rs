//! Scenario tuning

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration for every built-in scenario
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenariosConfig {
    #[serde(default)]
    pub product: ProductScenarioConfig,

    #[serde(default)]
    pub search: SearchScenarioConfig,
}

/// Product service scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductScenarioConfig {
    /// Product ids 1..=product_count are seeded on start and then read/written
    #[serde(default = "default_product_count")]
    pub product_count: u32,

    /// How product payloads are put on the wire
    #[serde(default)]
    pub body_encoding: BodyEncoding,
}

/// Wire encoding of JSON request bodies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    /// Let the client serialize the value
    #[default]
    Json,
    /// Serialize up front and send bytes with an explicit content type
    Raw,
}

/// Product search scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchScenarioConfig {
    /// Query terms picked uniformly per search
    #[serde(default = "default_search_terms")]
    pub terms: Vec<String>,
}

impl Default for ProductScenarioConfig {
    fn default() -> Self {
        Self {
            product_count: default_product_count(),
            body_encoding: BodyEncoding::default(),
        }
    }
}

impl Default for SearchScenarioConfig {
    fn default() -> Self {
        Self {
            terms: default_search_terms(),
        }
    }
}

impl fmt::Display for BodyEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyEncoding::Json => write!(f, "json"),
            BodyEncoding::Raw => write!(f, "raw"),
        }
    }
}

impl FromStr for BodyEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(BodyEncoding::Json),
            "raw" => Ok(BodyEncoding::Raw),
            _ => Err(format!("Invalid body encoding: {}", s)),
        }
    }
}

impl Validatable for ScenariosConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.product.validate()?;
        self.search.validate()?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "scenarios"
    }
}

impl Validatable for ProductScenarioConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.product_count, "product_count", self.domain_name())
    }

    fn domain_name(&self) -> &'static str {
        "scenarios.product"
    }
}

impl Validatable for SearchScenarioConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.terms.is_empty() {
            return Err(self.validation_error("At least one search term must be configured"));
        }
        if self.terms.iter().any(|t| t.trim().is_empty()) {
            return Err(self.validation_error("Search terms cannot be blank"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "scenarios.search"
    }
}

fn default_product_count() -> u32 {
    50
}

fn default_search_terms() -> Vec<String> {
    [
        "alpha",
        "beta",
        "gamma",
        "delta",
        "epsilon",
        "electronics",
        "books",
        "home",
        "sports",
        "clothing",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_defaults() {
        let config = ScenariosConfig::default();
        assert_eq!(config.product.product_count, 50);
        assert_eq!(config.product.body_encoding, BodyEncoding::Json);
        assert_eq!(config.search.terms.len(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scenario_validation() {
        let mut config = ScenariosConfig::default();
        config.product.product_count = 0;
        assert!(config.validate().is_err());

        config = ScenariosConfig::default();
        config.search.terms.clear();
        assert!(config.validate().is_err());

        config = ScenariosConfig::default();
        config.search.terms.push("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_body_encoding_from_str() {
        assert_eq!("JSON".parse::<BodyEncoding>().unwrap(), BodyEncoding::Json);
        assert_eq!("raw".parse::<BodyEncoding>().unwrap(), BodyEncoding::Raw);
        assert!("form".parse::<BodyEncoding>().is_err());
    }
}
