//! Engine configuration

use serde::{Deserialize, Serialize};

use foyer_core::Money;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Currency code used in display price strings
    pub currency: String,

    /// Accessible name of the add-to-cart affordance on an item card
    pub add_label: String,

    /// Accessible name of the item-level confirm action on a customization
    /// panel
    pub confirm_label: String,

    /// Element resolver tuning
    pub resolver: ResolverConfig,

    /// Modifier/alternate selector tuning
    pub selector: SelectorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency: "QAR".to_string(),
            add_label: "Add".to_string(),
            confirm_label: "Confirm".to_string(),
            resolver: ResolverConfig::default(),
            selector: SelectorConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Price string as shown on a card, e.g. "QAR 15.00"
    pub fn display_price(&self, price: Money) -> String {
        format!("{} {}", self.currency, price)
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_string();
        self
    }

    pub fn with_add_label(mut self, label: &str) -> Self {
        self.add_label = label.to_string();
        self
    }
}

/// Element resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Bounded wait for a matcher strategy to yield a visible candidate
    pub visible_timeout_ms: u64,

    /// Poll interval while waiting for candidates or settle conditions
    pub poll_interval_ms: u64,

    /// Maximum structural ancestors walked when locating the card container
    pub ancestor_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            visible_timeout_ms: 4000,
            poll_interval_ms: 100,
            ancestor_depth: 4,
        }
    }
}

/// Modifier/alternate selector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Attempt budget per candidate; the loop bound is group size times this
    pub attempts_per_candidate: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            attempts_per_candidate: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_price() {
        let config = EngineConfig::default();
        assert_eq!(config.display_price(Money::from_cents(1500)), "QAR 15.00");

        let config = config.with_currency("USD");
        assert_eq!(config.display_price(Money::from_cents(805)), "USD 8.05");
    }
}
