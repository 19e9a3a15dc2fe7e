//! On-screen element resolution
//!
//! Generated menu UI routinely shows the same item name in several places
//! (duplicate items across categories, partial text overlap), so a text
//! match alone is never trusted. A candidate is accepted only when an
//! enclosing card-like container carries BOTH the expected name and the
//! expected price and offers an add affordance. Failing that, the resolver
//! refuses to guess: clicking the wrong card would corrupt the order total
//! without any later assertion noticing.

use std::time::{Duration, Instant};
use tracing::{debug, warn};

use foyer_core::Money;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::surface::{NodeHandle, PageSurface, Role, TextPattern};

/// A verified item card: the enclosing container plus its add affordance.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub container: NodeHandle,
    pub add_control: NodeHandle,
}

/// Ordered matcher strategies; each is attempted only if the previous one
/// produced no verified container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameMatcher {
    /// Case-insensitive substring match on the full display name
    FullName,
    /// First word of the name longer than two characters
    SignificantWord,
    /// Whole name as a regex, newlines normalized to whitespace wildcards
    NormalizedRegex,
}

const MATCHER_CHAIN: [NameMatcher; 3] = [
    NameMatcher::FullName,
    NameMatcher::SignificantWord,
    NameMatcher::NormalizedRegex,
];

impl NameMatcher {
    /// Pattern for this strategy, or None when the name cannot support it.
    fn pattern(&self, name: &str) -> Option<TextPattern> {
        match self {
            NameMatcher::FullName => Some(TextPattern::Contains(name.to_string())),
            NameMatcher::SignificantWord => {
                significant_word(name).map(|w| TextPattern::Contains(w.to_string()))
            }
            NameMatcher::NormalizedRegex => Some(TextPattern::Regex(normalized_regex(name))),
        }
    }
}

fn significant_word(name: &str) -> Option<&str> {
    name.split_whitespace().find(|w| w.chars().count() > 2)
}

fn normalized_regex(name: &str) -> String {
    name.split_whitespace()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// Disambiguates possibly-duplicate on-screen nodes down to the one true
/// add affordance for an item.
pub struct ElementResolver<'a, S: PageSurface + ?Sized> {
    surface: &'a S,
    config: &'a EngineConfig,
}

impl<'a, S: PageSurface + ?Sized> ElementResolver<'a, S> {
    pub fn new(surface: &'a S, config: &'a EngineConfig) -> Self {
        Self { surface, config }
    }

    /// Resolve `name` at `expected_price` to a verified card.
    ///
    /// Fatal on exhaustion: the error names the expected item and price and
    /// reports how many raw name matches were seen.
    pub async fn resolve(&self, name: &str, expected_price: Money) -> EngineResult<Resolved> {
        let price_text = expected_price.to_string();
        let mut raw_matches = 0usize;

        for matcher in MATCHER_CHAIN {
            let Some(pattern) = matcher.pattern(name) else {
                continue;
            };

            let candidates = self.visible_candidates(&pattern).await?;
            if candidates.is_empty() {
                debug!(strategy = ?matcher, "no visible candidates for {}", pattern);
                continue;
            }
            raw_matches = raw_matches.max(candidates.len());
            debug!(
                strategy = ?matcher,
                count = candidates.len(),
                "verifying candidates for '{}'",
                name
            );

            for candidate in &candidates {
                if let Some(resolved) = self.verify(candidate, &pattern, &price_text).await? {
                    return Ok(resolved);
                }
            }
            warn!(
                strategy = ?matcher,
                "no candidate passed the name+price check for '{}'",
                name
            );
        }

        Err(EngineError::Resolution {
            name: name.to_string(),
            price: price_text,
            candidates: raw_matches,
        })
    }

    /// Bounded wait for at least one visible text match.
    async fn visible_candidates(&self, pattern: &TextPattern) -> EngineResult<Vec<NodeHandle>> {
        let timeout = Duration::from_millis(self.config.resolver.visible_timeout_ms);
        let interval = Duration::from_millis(self.config.resolver.poll_interval_ms);
        let start = Instant::now();

        loop {
            let mut visible = Vec::new();
            for node in self.surface.find_by_text(pattern).await? {
                if self.surface.is_visible(&node).await? {
                    visible.push(node);
                }
            }
            if !visible.is_empty() {
                return Ok(visible);
            }
            if start.elapsed() >= timeout {
                return Ok(Vec::new());
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// Walk a bounded number of ancestors to the enclosing card-like
    /// container and confirm it carries BOTH the expected name and the
    /// expected price.
    ///
    /// The nearest ancestor holding an add affordance is taken as the card;
    /// the walk never widens past it, since a wider ancestor's text spans
    /// neighboring cards.
    async fn verify(
        &self,
        candidate: &NodeHandle,
        name_pattern: &TextPattern,
        price_text: &str,
    ) -> EngineResult<Option<Resolved>> {
        let mut current = candidate.clone();

        for _ in 0..self.config.resolver.ancestor_depth {
            let Some(container) = self.surface.parent(&current).await? else {
                break;
            };

            if let Some(add_control) = self.add_affordance(&container).await? {
                let text = self.surface.inner_text(&container).await?;
                if name_pattern.matches(&text) && text.contains(price_text) {
                    return Ok(Some(Resolved {
                        container,
                        add_control,
                    }));
                }
                return Ok(None);
            }

            current = container;
        }

        Ok(None)
    }

    async fn add_affordance(&self, container: &NodeHandle) -> EngineResult<Option<NodeHandle>> {
        let label = TextPattern::Contains(self.config.add_label.clone());
        let controls = self
            .surface
            .find_role_within(container, Role::Button, Some(&label))
            .await?;

        for control in controls {
            if self.surface.is_visible(&control).await? {
                return Ok(Some(control));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significant_word_skips_short_words() {
        assert_eq!(significant_word("XL Combo Meal"), Some("Combo"));
        assert_eq!(significant_word("Popcorn Regular"), Some("Popcorn"));
        assert_eq!(significant_word("a an"), None);
    }

    #[test]
    fn test_normalized_regex_bridges_newlines() {
        let pattern = TextPattern::Regex(normalized_regex("Combo\nMeal (Large)"));
        assert!(pattern.matches("Combo Meal (Large)"));
        assert!(pattern.matches("Combo\n  Meal (Large)"));
        assert!(!pattern.matches("Combo Meal"));
    }

    #[test]
    fn test_matcher_chain_order() {
        assert_eq!(
            MATCHER_CHAIN,
            [
                NameMatcher::FullName,
                NameMatcher::SignificantWord,
                NameMatcher::NormalizedRegex
            ]
        );
    }

    #[test]
    fn test_significant_word_pattern_absent_for_short_names() {
        assert!(NameMatcher::SignificantWord.pattern("a b").is_none());
        assert!(NameMatcher::FullName.pattern("a b").is_some());
    }
}
