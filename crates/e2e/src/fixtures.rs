//! Catalog and page fixtures
//!
//! A small sample menu covering all three item shapes, plus helpers that
//! install a realistic item card (name, price, add control, customization
//! panel, quantity stepper) on a scripted page.

use async_trait::async_trait;

use foyer_core::{Catalog, CatalogItem};
use foyer_engine::{CatalogSource, EngineConfig, EngineResult, NodeHandle, ResolverConfig};

use crate::page::{ElementSpec, ScriptedPage};

/// One category per item shape: a plain snack, a combo with a required
/// modifier group, and a drink with a priced alternate.
pub const SAMPLE_MENU: &str = r#"{
    "data": [
        {
            "name": "Snacks",
            "ConcessionItems": [
                {
                    "display_name": "Popcorn Regular",
                    "concession_item_name": "POPCORN_REG",
                    "price_in_cents": 1500
                }
            ]
        },
        {
            "name": "Combos",
            "ConcessionItems": [
                {
                    "display_name": "Combo Meal",
                    "concession_item_name": "COMBO_MEAL",
                    "price_in_cents": 2500,
                    "ModifierGroups": [
                        {
                            "display_name": "Sides",
                            "minimum_quantity": 2,
                            "maximum_quantity": 2,
                            "ModifierItems": [
                                { "id": "41", "display_name": "Fries" },
                                { "id": "42", "display_name": "Onion Rings" },
                                { "id": "43", "display_name": "Side Salad" }
                            ]
                        }
                    ]
                }
            ]
        },
        {
            "name": "Drinks",
            "ConcessionItems": [
                {
                    "display_name": "Soda",
                    "concession_item_name": "SODA_REG",
                    "price_in_cents": 800,
                    "AlternateItems": [
                        { "id": "7", "display_name": "Soda Large", "price_in_cents": 1200 }
                    ]
                }
            ]
        }
    ]
}"#;

pub fn sample_catalog() -> Catalog {
    Catalog::parse(SAMPLE_MENU).expect("sample menu parses")
}

/// A catalog source serving the sample menu.
pub struct StaticMenu;

#[async_trait]
impl CatalogSource for StaticMenu {
    async fn fetch_menu(&self) -> EngineResult<serde_json::Value> {
        Ok(serde_json::from_str(SAMPLE_MENU).expect("sample menu is valid JSON"))
    }
}

/// Engine config with short waits so failure-path tests stay fast.
pub fn fast_config() -> EngineConfig {
    EngineConfig {
        resolver: ResolverConfig {
            visible_timeout_ms: 200,
            poll_interval_ms: 10,
            ancestor_depth: 4,
        },
        ..EngineConfig::default()
    }
}

/// Handles to the interesting parts of one installed item card.
pub struct CardFixture {
    pub card: NodeHandle,
    pub add: NodeHandle,
    pub stepper: NodeHandle,
    pub confirm: Option<NodeHandle>,
    /// Modifier checkboxes or alternate radios, in catalog order
    pub option_controls: Vec<NodeHandle>,
}

/// Install a card for `item`: name and price text, an add control, and the
/// customization panel its shape requires. The quantity stepper is revealed
/// by the action that completes the add (the add control for plain and
/// alternated items, the confirm control for modified ones).
pub fn install_card(page: &ScriptedPage, item: &CatalogItem, config: &EngineConfig) -> CardFixture {
    let section = page.add(ElementSpec::container());
    let card = page.add(ElementSpec::container().under(&section));
    page.add(ElementSpec::text(&item.name).under(&card));
    page.add(ElementSpec::text(&config.display_price(item.price)).under(&card));

    let add = page.add(ElementSpec::button(&config.add_label).under(&card));
    let stepper = page.add(ElementSpec::spinbutton().hidden().under(&card));

    let mut option_controls = Vec::new();
    let mut confirm = None;

    if !item.modifier_groups.is_empty() {
        let panel = page.add(ElementSpec::container().hidden().under(&card));
        page.reveal_on_click(&add, &panel);

        for group in &item.modifier_groups {
            page.add(ElementSpec::text(&group.name).under(&panel));
            for choice in &group.items {
                let mut spec = ElementSpec::checkbox(&choice.name).under(&panel);
                if let Some(id) = &choice.id {
                    spec = spec.with_dom_id(id);
                }
                option_controls.push(page.add(spec));
                page.add(ElementSpec::text(&choice.name).under(&panel));
            }
        }

        let confirm_control = page.add(ElementSpec::button(&config.confirm_label).under(&panel));
        page.reveal_on_click(&confirm_control, &stepper);
        confirm = Some(confirm_control);
    } else if !item.alternates.is_empty() {
        let panel = page.add(ElementSpec::container().hidden().under(&card));
        page.reveal_on_click(&add, &panel);
        page.reveal_on_click(&add, &stepper);

        for alternate in &item.alternates {
            let mut spec = ElementSpec::radio(&alternate.name).under(&panel);
            if let Some(id) = &alternate.id {
                spec = spec.with_dom_id(id);
            }
            option_controls.push(page.add(spec));
            page.add(ElementSpec::text(&alternate.name).under(&panel));
        }
    } else {
        page.reveal_on_click(&add, &stepper);
    }

    CardFixture {
        card,
        add,
        stepper,
        confirm,
        option_controls,
    }
}

/// Install a decoy card: same name, different price. The resolver must
/// refuse it.
pub fn install_decoy(page: &ScriptedPage, name: &str, price_text: &str, add_label: &str) -> NodeHandle {
    let section = page.add(ElementSpec::container());
    let card = page.add(ElementSpec::container().under(&section));
    page.add(ElementSpec::text(name).under(&card));
    page.add(ElementSpec::text(price_text).under(&card));
    page.add(ElementSpec::button(add_label).under(&card))
}
