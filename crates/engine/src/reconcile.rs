//! Reconciliation checks
//!
//! Cross-checks the tracker's view of the order against the host UI and the
//! checkout payload. A mismatch is a real state divergence, not flakiness:
//! it raises a hard error and is never retried or waived.

use std::time::Duration;
use tracing::info;

use foyer_core::OrderTracker;

use crate::checkout::CheckoutCapture;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::surface::{NodeHandle, PageSurface, TextPattern};
use crate::wait::wait_until;

/// UI-side reconciliation against the host's cart region.
pub struct Reconciler<'a, S: PageSurface + ?Sized> {
    surface: &'a S,
    config: &'a EngineConfig,
}

impl<'a, S: PageSurface + ?Sized> Reconciler<'a, S> {
    pub fn new(surface: &'a S, config: &'a EngineConfig) -> Self {
        Self { surface, config }
    }

    /// Every tracker line must be visible in the cart, and the aggregate F&B
    /// row must show the tracker's total rounded to the nearest integer
    /// unit, prefixed with "+".
    pub async fn check_cart(&self, cart: &NodeHandle, tracker: &OrderTracker) -> EngineResult<()> {
        for line in tracker.items() {
            let pattern = TextPattern::Contains(line.concession_name.clone());
            if !self.visible_in(cart, &pattern).await {
                return Err(EngineError::Reconciliation(format!(
                    "cart does not show '{}'",
                    line.concession_name
                )));
            }
        }

        let aggregate = format!("+{}", tracker.total_price().round_major());
        let pattern = TextPattern::Contains(aggregate.clone());
        if !self.visible_in(cart, &pattern).await {
            return Err(EngineError::Reconciliation(format!(
                "cart aggregate row does not show '{}' (tracked total {})",
                aggregate,
                tracker.total_price()
            )));
        }

        info!(
            "cart agrees with tracker: {} line(s), total {}",
            tracker.len(),
            tracker.total_price()
        );
        Ok(())
    }

    /// Bounded wait for a visible scoped text match.
    async fn visible_in(&self, scope: &NodeHandle, pattern: &TextPattern) -> bool {
        let timeout = Duration::from_millis(self.config.resolver.visible_timeout_ms);
        let interval = Duration::from_millis(self.config.resolver.poll_interval_ms);
        let surface = self.surface;

        wait_until(timeout, interval, || async move {
            match surface.find_text_within(scope, pattern).await {
                Ok(nodes) => {
                    for node in nodes {
                        if surface.is_visible(&node).await.unwrap_or(false) {
                            return true;
                        }
                    }
                    false
                }
                Err(_) => false,
            }
        })
        .await
    }
}

/// API-side reconciliation against the captured checkout payload.
///
/// The wire subtotal must equal the tracked total to the cent, and every
/// payload line's display representation must correspond to a tracked line.
pub fn check_payload(capture: &CheckoutCapture, tracker: &OrderTracker) -> EngineResult<()> {
    let wire_total = capture.concession_total()?;
    let tracked_total = tracker.total_price();

    if wire_total.cents() != tracked_total.cents() {
        return Err(EngineError::Reconciliation(format!(
            "checkout subtotal {} disagrees with tracked total {}",
            wire_total, tracked_total
        )));
    }

    for line in capture.concession_lines()? {
        let Some(display) = line.display_name() else {
            return Err(EngineError::Reconciliation(
                "checkout line carries no displayable name".to_string(),
            ));
        };

        let matched = tracker
            .items()
            .iter()
            .any(|tracked| display.contains(&tracked.concession_name));
        if !matched {
            return Err(EngineError::Reconciliation(format!(
                "checkout line '{}' has no tracked counterpart",
                display
            )));
        }
    }

    info!(
        "checkout payload agrees with tracker: total {}",
        tracked_total
    );
    Ok(())
}
