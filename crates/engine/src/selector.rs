//! Modifier and alternate selection
//!
//! Both selectors draw candidates uniformly at random so that scenario runs
//! spread coverage across the menu instead of always exercising the first
//! choice. Attempts are bounded; an unsatisfied constraint comes back as a
//! typed outcome and the flow layer decides fatality.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use foyer_core::{AlternateItem, CatalogItem, ModifierGroup, ModifierItem};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::surface::{NodeHandle, PageSurface, Role, SurfaceError, SurfaceResult, TextPattern};

/// One committed modifier selection.
#[derive(Debug, Clone)]
pub struct SelectedModifier {
    pub name: String,
    pub id: Option<String>,
}

/// Outcome of selecting one modifier group.
#[derive(Debug, Clone)]
pub enum ModifierOutcome {
    /// Exactly the required count was committed.
    Satisfied(Vec<SelectedModifier>),
    /// The attempt budget ran out short of the requirement. Partial modifier
    /// selection is not a valid order state; callers must not commit it.
    Unsatisfied {
        group: String,
        selected: usize,
        required: usize,
    },
}

/// Commits modifier-group and alternate selections through the surface.
pub struct ChoiceSelector<'a, S: PageSurface + ?Sized> {
    surface: &'a S,
    config: &'a EngineConfig,
}

impl<'a, S: PageSurface + ?Sized> ChoiceSelector<'a, S> {
    pub fn new(surface: &'a S, config: &'a EngineConfig) -> Self {
        Self { surface, config }
    }

    /// Select `minimum_quantity` modifiers for one group.
    ///
    /// Groups with no candidates are skipped (satisfied with nothing).
    /// Repeated picks of the same candidate are allowed; the requirement is
    /// a count, not distinctness.
    pub async fn select_modifiers(
        &self,
        scope: &NodeHandle,
        group: &ModifierGroup,
        rng: &mut impl Rng,
    ) -> EngineResult<ModifierOutcome> {
        let required = group.minimum_quantity as usize;
        if group.items.is_empty() || required == 0 {
            return Ok(ModifierOutcome::Satisfied(Vec::new()));
        }

        let mut order: Vec<&ModifierItem> = group.items.iter().collect();
        order.shuffle(rng);

        let budget = order.len() * self.config.selector.attempts_per_candidate;
        let mut selected = Vec::new();
        let mut attempt = 0;

        while selected.len() < required && attempt < budget {
            let candidate = order[attempt % order.len()];
            attempt += 1;

            match self.try_modifier(scope, candidate).await {
                Ok(()) => {
                    debug!(group = %group.name, "selected modifier '{}'", candidate.name);
                    selected.push(SelectedModifier {
                        name: candidate.name.clone(),
                        id: candidate.id.clone(),
                    });
                }
                Err(e) => {
                    warn!(group = %group.name, "modifier '{}' failed: {}", candidate.name, e);
                    // A one-candidate group has nothing left to draw.
                    if order.len() == 1 {
                        break;
                    }
                }
            }
        }

        if selected.len() < required {
            Ok(ModifierOutcome::Unsatisfied {
                group: group.name.clone(),
                selected: selected.len(),
                required,
            })
        } else {
            Ok(ModifierOutcome::Satisfied(selected))
        }
    }

    /// Id-based exact lookup, then a scoped name search, then an add
    /// affordance inside the matched text's immediate container.
    async fn try_modifier(&self, scope: &NodeHandle, candidate: &ModifierItem) -> SurfaceResult<()> {
        if let Some(id) = &candidate.id {
            if let Some(control) = self.surface.find_by_id(id).await? {
                return self.surface.check(&control).await;
            }
        }

        let name = TextPattern::Contains(candidate.name.clone());
        let matches = self.surface.find_text_within(scope, &name).await?;
        let Some(anchor) = matches.first() else {
            return Err(SurfaceError::Interaction(format!(
                "no control found for modifier '{}'",
                candidate.name
            )));
        };

        if self.surface.click(anchor).await.is_ok() {
            return Ok(());
        }

        // The text itself would not take the click; look for an add control
        // in the small ancestor window around it.
        let add = TextPattern::Contains(self.config.add_label.clone());
        if let Some(window) = self.surface.parent(anchor).await? {
            if let Some(control) = self
                .surface
                .find_role_within(&window, Role::Button, Some(&add))
                .await?
                .first()
            {
                return self.surface.click(control).await;
            }
        }

        Err(SurfaceError::Interaction(format!(
            "modifier '{}' did not accept the selection",
            candidate.name
        )))
    }

    /// Pick exactly one alternate uniformly at random and commit it.
    ///
    /// Returns the chosen alternate; the caller commits its name and its
    /// price (the alternate is a substitution and is price-authoritative).
    pub async fn select_alternate(
        &self,
        scope: &NodeHandle,
        item: &CatalogItem,
        rng: &mut impl Rng,
    ) -> EngineResult<AlternateItem> {
        let Some(choice) = item.alternates.choose(rng) else {
            return Err(EngineError::AlternateSelection {
                item: item.name.clone(),
                reason: "item has no alternates".to_string(),
            });
        };

        match self.try_alternate(scope, choice).await {
            Ok(()) => {
                debug!("selected alternate '{}' for '{}'", choice.name, item.name);
                Ok(choice.clone())
            }
            Err(e) => Err(EngineError::AlternateSelection {
                item: item.name.clone(),
                reason: e.to_string(),
            }),
        }
    }

    /// Id-based lookup, then scoped name search, then the first available
    /// single-choice control.
    async fn try_alternate(&self, scope: &NodeHandle, choice: &AlternateItem) -> SurfaceResult<()> {
        if let Some(id) = &choice.id {
            if let Some(control) = self.surface.find_by_id(id).await? {
                return self.surface.check(&control).await;
            }
        }

        let name = TextPattern::Contains(choice.name.clone());
        if let Some(node) = self.surface.find_text_within(scope, &name).await?.first() {
            return self.surface.click(node).await;
        }

        if let Some(control) = self
            .surface
            .find_role_within(scope, Role::Radio, None)
            .await?
            .first()
        {
            return self.surface.check(control).await;
        }

        Err(SurfaceError::Interaction(format!(
            "no single-choice control for alternate '{}'",
            choice.name
        )))
    }
}
