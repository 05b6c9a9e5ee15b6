use crate::analytics::normalize_author;
use crate::types::{DashboardError, Result};
use std::collections::HashMap;
use tracing::info;

/// Default per-article rate when nothing has been persisted.
pub const FALLBACK_RATE: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    default_rate: f64,
    overrides: HashMap<String, f64>,
}

impl RateTable {
    pub fn new(default_rate: f64) -> Result<Self> {
        Ok(Self {
            default_rate: validate_rate(default_rate)?,
            overrides: HashMap::new(),
        })
    }

    pub fn default_rate(&self) -> f64 {
        self.default_rate
    }

    pub fn overrides(&self) -> &HashMap<String, f64> {
        &self.overrides
    }

    pub fn override_for(&self, author: &str) -> Option<f64> {
        self.overrides.get(normalize_author(Some(author))).copied()
    }

    /// Override if present, else the default. Total: never NaN, never negative.
    pub fn rate_for(&self, author: &str) -> f64 {
        self.override_for(author).unwrap_or(self.default_rate)
    }

    /// Rejected input leaves the table untouched. Keyed by the normalized
    /// author name so it lines up with `author_stats`.
    pub fn update_rate(&mut self, author: &str, rate: f64) -> Result<()> {
        let rate = validate_rate(rate)?;
        let author = normalize_author(Some(author));
        self.overrides.insert(author.to_string(), rate);
        info!("Rate for {} set to {:.2}", author, rate);
        Ok(())
    }

    pub fn set_default_rate(&mut self, rate: f64) -> Result<()> {
        self.default_rate = validate_rate(rate)?;
        info!("Default rate set to {:.2}", self.default_rate);
        Ok(())
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            default_rate: FALLBACK_RATE,
            overrides: HashMap::new(),
        }
    }
}

pub fn validate_rate(rate: f64) -> Result<f64> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(rate)
    } else {
        Err(DashboardError::InvalidRateInput {
            value: rate.to_string(),
        })
    }
}

/// Text-field input to a validated rate.
pub fn parse_rate(input: &str) -> Result<f64> {
    let rate = input
        .trim()
        .parse::<f64>()
        .map_err(|_| DashboardError::InvalidRateInput {
            value: input.to_string(),
        })?;
    validate_rate(rate).map_err(|_| DashboardError::InvalidRateInput {
        value: input.to_string(),
    })
}
