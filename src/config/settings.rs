use anyhow::{Context, Result};

use crate::domain::Category;

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "dream_badminton.db".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Bearer token required on admin routes; `None` leaves them open
    pub admin_token: Option<String>,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            admin_token: None,
            default_page_size: 50,
            max_page_size: 500,
        }
    }
}

/// Price discount applied to every rank up to and including `max_rank`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTier {
    pub max_rank: i32,
    pub discount: f64,
}

impl PriceTier {
    pub const fn new(max_rank: i32, discount: f64) -> Self {
        Self { max_rank, discount }
    }
}

#[derive(Debug, Clone)]
pub struct PricingSettings {
    pub base_price: f64,
    pub floor_price: f64,
    pub doubles_multiplier: f64,
    /// Ascending by `max_rank`; ranks past the last tier get `floor_price`
    pub tiers: Vec<PriceTier>,
}

impl PricingSettings {
    pub fn multiplier_for(&self, category: Category) -> f64 {
        if category.is_doubles() {
            self.doubles_multiplier
        } else {
            1.0
        }
    }
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            base_price: 20.0,
            floor_price: 5.0,
            doubles_multiplier: 0.8,
            tiers: vec![
                PriceTier::new(5, 0.0),
                PriceTier::new(10, 2.0),
                PriceTier::new(20, 4.0),
                PriceTier::new(30, 6.0),
                PriceTier::new(50, 8.0),
                PriceTier::new(75, 10.0),
                PriceTier::new(100, 12.0),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportSettings {
    /// Price differences up to this amount are not reported as changes
    pub price_tolerance: f64,
    pub singles_preview: usize,
    pub doubles_preview: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            price_tolerance: 0.1,
            singles_preview: 10,
            doubles_preview: 5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub pricing: PricingSettings,
    pub import: ImportSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve configuration from the process environment.
    /// Called once at startup; the result is passed down explicitly.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(path) = lookup("DATABASE_PATH") {
            config.database.path = path;
        }

        config.server.admin_token = lookup("ADMIN_TOKEN").filter(|token| !token.trim().is_empty());

        if let Some(raw) = lookup("PRICE_TOLERANCE") {
            config.import.price_tolerance = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid PRICE_TOLERANCE: {raw}"))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.database.path, "dream_badminton.db");
        assert_eq!(config.server.admin_token, None);
        assert_eq!(config.import.price_tolerance, 0.1);
        assert_eq!(config.pricing.tiers.len(), 7);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_PATH", "/tmp/rankings.db"),
            ("ADMIN_TOKEN", "s3cret"),
            ("PRICE_TOLERANCE", "0.5"),
        ]))
        .unwrap();

        assert_eq!(config.database.path, "/tmp/rankings.db");
        assert_eq!(config.server.admin_token.as_deref(), Some("s3cret"));
        assert_eq!(config.import.price_tolerance, 0.5);
    }

    #[test]
    fn blank_admin_token_is_ignored() {
        let config = AppConfig::from_lookup(lookup_from(&[("ADMIN_TOKEN", "  ")])).unwrap();
        assert!(config.server.admin_token.is_none());
    }

    #[test]
    fn rejects_bad_tolerance() {
        assert!(AppConfig::from_lookup(lookup_from(&[("PRICE_TOLERANCE", "abc")])).is_err());
    }

    #[test]
    fn doubles_categories_use_multiplier() {
        let pricing = PricingSettings::default();
        assert_eq!(pricing.multiplier_for(Category::MS), 1.0);
        assert_eq!(pricing.multiplier_for(Category::XD), 0.8);
    }
}
