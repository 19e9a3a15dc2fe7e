//! Checkout payload capture
//!
//! The third source of truth: the order-commit network exchange. The payload
//! shape varies between host deployments, so fields are located by key
//! search rather than a rigid schema, preferring the response body over the
//! request body when both carry a field.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use foyer_core::Money;

use crate::error::{EngineError, EngineResult};
use crate::surface::{CapturedExchange, PageSurface, RequestMatcher};

/// A captured checkout exchange with typed accessors over its F&B fields.
#[derive(Debug, Clone)]
pub struct CheckoutCapture {
    exchange: CapturedExchange,
}

impl CheckoutCapture {
    /// Wait for the checkout exchange on the wire and capture it.
    pub async fn capture<S: PageSurface + ?Sized>(
        surface: &S,
        matcher: &RequestMatcher,
        timeout: Duration,
    ) -> EngineResult<Self> {
        let exchange = surface.wait_for_network(matcher, timeout).await?;
        Ok(Self::from_exchange(exchange))
    }

    pub fn from_exchange(exchange: CapturedExchange) -> Self {
        Self { exchange }
    }

    fn bodies(&self) -> impl Iterator<Item = &Value> {
        self.exchange
            .response_body
            .iter()
            .chain(std::iter::once(&self.exchange.request_body))
    }

    /// F&B monetary subtotal as carried on the wire (integer cents).
    pub fn concession_total(&self) -> EngineResult<Money> {
        self.bodies()
            .find_map(|body| find_key(body, "concession_price_in_cents"))
            .and_then(Value::as_i64)
            .map(Money::from_cents)
            .ok_or_else(|| {
                EngineError::Reconciliation(
                    "checkout payload carries no concession_price_in_cents".to_string(),
                )
            })
    }

    /// Per-line concession records from the payload's concessionItemData.
    pub fn concession_lines(&self) -> EngineResult<Vec<ConcessionLine>> {
        let Some(data) = self.bodies().find_map(|body| find_key(body, "concessionItemData"))
        else {
            return Ok(Vec::new());
        };

        serde_json::from_value(data.clone()).map_err(|e| {
            EngineError::Reconciliation(format!("malformed concessionItemData: {}", e))
        })
    }
}

/// Depth-first search for the first occurrence of `key` in a JSON tree.
fn find_key<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    match value {
        Value::Object(map) => map
            .get(key)
            .or_else(|| map.values().find_map(|v| find_key(v, key))),
        Value::Array(items) => items.iter().find_map(|v| find_key(v, key)),
        _ => None,
    }
}

/// One F&B line in the checkout payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ConcessionLine {
    #[serde(default)]
    pub concession_name: Option<String>,
    #[serde(default)]
    pub parent_product_name: Option<String>,
    #[serde(default, rename = "type")]
    pub line_type: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

impl ConcessionLine {
    /// Voucher lines display under the parent product, not the concession.
    pub fn is_voucher(&self) -> bool {
        self.line_type.as_deref() == Some("voucher")
    }

    /// The representation the cart and tracker are expected to carry for
    /// this line.
    pub fn display_name(&self) -> Option<String> {
        if self.is_voucher() {
            self.parent_product_name.clone()
        } else if let Some(count) = self.count {
            // Bundled accessory lines display as a count, not a bare name.
            self.concession_name
                .as_ref()
                .map(|name| format!("{} count: {}", name, count))
        } else {
            self.concession_name.clone()
        }
    }
}
