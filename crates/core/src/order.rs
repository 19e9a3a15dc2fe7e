//! Per-scenario order ledger
//!
//! The tracker is the single source of truth the scenario queries. It is
//! strictly additive: lines are appended on confirmed adds and the running
//! total is accumulated, never recomputed.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// One confirmed order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// Resolved item name (post-modifier/alternate)
    pub name: String,
    /// Unit price actually charged
    pub price: Money,
    /// Price string as shown on the card, e.g. "QAR 15.00"
    pub display_price: String,
    /// Canonical concession name used for reconciliation lookups
    pub concession_name: String,
}

/// Append-only ledger of confirmed order lines with a running total.
#[derive(Debug, Clone, Default)]
pub struct OrderTracker {
    lines: Vec<OrderLine>,
    total: Money,
}

impl OrderTracker {
    /// Create an empty tracker at scenario start.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one confirmed line and accumulate its price into the total.
    pub fn add_item(&mut self, name: &str, price: Money, display_price: &str, concession_name: &str) {
        self.total += price;
        self.lines.push(OrderLine {
            name: name.to_string(),
            price,
            display_price: display_price.to_string(),
            concession_name: concession_name.to_string(),
        });
    }

    /// Confirmed lines in insertion order.
    pub fn items(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Running total; always the exact sum of the line prices.
    pub fn total_price(&self) -> Money {
        self.total
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Serializable snapshot for result reporting.
    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            lines: self.lines.clone(),
            total: self.total,
            generated_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Snapshot of a tracker, written alongside scenario results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub lines: Vec<OrderLine>,
    pub total: Money,
    pub generated_at: i64,
}
