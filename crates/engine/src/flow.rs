//! Add-item flows
//!
//! One flow per item shape. Each flow resolves the item card with price
//! verification, performs the selections that shape requires, confirms the
//! add took effect, and only then appends to the caller's tracker. The
//! tracker is owned by the scenario and passed in by mutable borrow; the
//! engine never holds order state of its own.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{info, warn};

use foyer_core::{CatalogItem, OrderTracker};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::resolve::ElementResolver;
use crate::selector::{ChoiceSelector, ModifierOutcome};
use crate::surface::{NodeHandle, PageSurface, Role, SurfaceError, TextPattern};
use crate::wait::wait_until;

/// Executes add-item operations against one scenario's page surface.
pub struct OrderFlow<'a, S: PageSurface + ?Sized> {
    surface: &'a S,
    config: &'a EngineConfig,
    rng: StdRng,
}

impl<'a, S: PageSurface + ?Sized> OrderFlow<'a, S> {
    pub fn new(surface: &'a S, config: &'a EngineConfig) -> Self {
        Self {
            surface,
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic randomized selection, for reproducible runs.
    pub fn seeded(surface: &'a S, config: &'a EngineConfig, seed: u64) -> Self {
        Self {
            surface,
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Add an item with no modifiers and no alternates.
    pub async fn add_plain(
        &mut self,
        item: &CatalogItem,
        tracker: &mut OrderTracker,
    ) -> EngineResult<()> {
        let resolved = ElementResolver::new(self.surface, self.config)
            .resolve(&item.name, item.price)
            .await?;

        self.surface.click(&resolved.add_control).await?;
        self.confirm_quantity_control(&resolved.container, &item.name).await?;

        let display_price = self.config.display_price(item.price);
        tracker.add_item(&item.name, item.price, &display_price, &item.concession_name);
        info!("added '{}' at {}", item.name, display_price);
        Ok(())
    }

    /// Add an item that requires modifier-group selections.
    ///
    /// Every group must reach its minimum; a shortfall aborts the whole add,
    /// since an under-specified item in the cart would be invisible to every
    /// later total check.
    pub async fn add_modified(
        &mut self,
        item: &CatalogItem,
        tracker: &mut OrderTracker,
    ) -> EngineResult<()> {
        let resolved = ElementResolver::new(self.surface, self.config)
            .resolve(&item.name, item.price)
            .await?;

        self.surface.click(&resolved.add_control).await?;

        let selector = ChoiceSelector::new(self.surface, self.config);
        for group in &item.modifier_groups {
            match selector
                .select_modifiers(&resolved.container, group, &mut self.rng)
                .await?
            {
                ModifierOutcome::Satisfied(selections) => {
                    info!(
                        "group '{}' satisfied with {} selection(s)",
                        group.name,
                        selections.len()
                    );
                }
                ModifierOutcome::Unsatisfied {
                    group,
                    selected,
                    required,
                } => {
                    return Err(EngineError::ModifierShortfall {
                        group,
                        selected,
                        required,
                    });
                }
            }
        }

        self.confirm_item(&resolved.container).await?;
        self.confirm_quantity_control(&resolved.container, &item.name).await?;

        let display_price = self.config.display_price(item.price);
        tracker.add_item(&item.name, item.price, &display_price, &item.concession_name);
        info!("added '{}' at {}", item.name, display_price);
        Ok(())
    }

    /// Add an item by substituting one of its alternates.
    ///
    /// The alternate is price-authoritative: the committed line carries the
    /// alternate's own price, never the base item's.
    pub async fn add_alternated(
        &mut self,
        item: &CatalogItem,
        tracker: &mut OrderTracker,
    ) -> EngineResult<()> {
        // The card itself still shows the base item's name and price.
        let resolved = ElementResolver::new(self.surface, self.config)
            .resolve(&item.name, item.price)
            .await?;

        self.surface.click(&resolved.add_control).await?;

        let selector = ChoiceSelector::new(self.surface, self.config);
        let alternate = selector
            .select_alternate(&resolved.container, item, &mut self.rng)
            .await?;

        self.confirm_quantity_control(&resolved.container, &item.name).await?;

        let line_name = format!("{} - {}", item.name, alternate.name);
        let display_price = self.config.display_price(alternate.price);
        tracker.add_item(&line_name, alternate.price, &display_price, &alternate.name);
        info!("added '{}' at {}", line_name, display_price);
        Ok(())
    }

    /// Invoke the item-level confirm action on a customization panel.
    async fn confirm_item(&self, container: &NodeHandle) -> EngineResult<()> {
        let label = TextPattern::Contains(self.config.confirm_label.clone());
        let controls = self
            .surface
            .find_role_within(container, Role::Button, Some(&label))
            .await?;

        match controls.first() {
            Some(control) => Ok(self.surface.click(control).await?),
            None => Err(EngineError::Surface(SurfaceError::Interaction(format!(
                "no '{}' control on the customization panel",
                self.config.confirm_label
            )))),
        }
    }

    /// Soft post-add verification: confirm a quantity control appeared.
    ///
    /// Cosmetic only, so it degrades through heuristics and is fatal only
    /// when every one of them comes up empty.
    async fn confirm_quantity_control(
        &self,
        container: &NodeHandle,
        item_name: &str,
    ) -> EngineResult<()> {
        let timeout = Duration::from_millis(self.config.resolver.visible_timeout_ms);
        let interval = Duration::from_millis(self.config.resolver.poll_interval_ms);
        let surface = self.surface;

        // Heuristic 1: a quantity spinner appears inside the card.
        let spinner = wait_until(timeout, interval, || async move {
            match surface.find_role_within(container, Role::Spinbutton, None).await {
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
        .await;
        if spinner {
            return Ok(());
        }
        warn!("no quantity spinner for '{}', trying stepper buttons", item_name);

        // Heuristic 2: an increment button inside the card.
        let plus = TextPattern::Contains("+".to_string());
        for control in self
            .surface
            .find_role_within(container, Role::Button, Some(&plus))
            .await?
        {
            if self.surface.is_visible(&control).await? {
                return Ok(());
            }
        }
        warn!("no stepper button for '{}', probing quantity attribute", item_name);

        // Heuristic 3: the card exposes a non-zero quantity attribute.
        if let Some(quantity) = self.surface.read_attribute(container, "data-quantity").await? {
            let quantity = quantity.trim();
            if !quantity.is_empty() && quantity != "0" {
                return Ok(());
            }
        }

        Err(EngineError::StepperMissing {
            item: item_name.to_string(),
        })
    }
}
