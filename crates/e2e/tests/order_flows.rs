//! Add-item flow scenarios against the scripted page

use foyer_core::{classify, AlternateItem, CatalogItem, ItemShape, ModifierGroup, ModifierItem, Money, OrderTracker};
use foyer_e2e::fixtures::{fast_config, install_card, install_decoy, sample_catalog};
use foyer_e2e::{init_tracing, ScriptedPage};
use foyer_engine::{EngineError, OrderFlow};

fn plain_item(name: &str, cents: i64) -> CatalogItem {
    CatalogItem {
        name: name.to_string(),
        concession_name: name.to_string(),
        price: Money::from_cents(cents),
        modifier_groups: Vec::new(),
        alternates: Vec::new(),
    }
}

#[tokio::test]
async fn test_add_plain_skips_wrong_price_duplicate() {
    init_tracing();
    let config = fast_config();
    let page = ScriptedPage::new();

    let catalog = sample_catalog();
    let classified = classify(&catalog);
    let popcorn = classified.require(ItemShape::Plain).unwrap();

    // Same name at the wrong price, earlier in document order.
    let decoy_add = install_decoy(&page, &popcorn.name, "QAR 17.00", &config.add_label);
    let fixture = install_card(&page, popcorn, &config);

    let mut tracker = OrderTracker::new();
    let mut flow = OrderFlow::seeded(&page, &config, 11);
    flow.add_plain(popcorn, &mut tracker).await.unwrap();

    assert_eq!(tracker.len(), 1);
    assert_eq!(tracker.total_price(), Money::from_cents(1500));
    assert_eq!(tracker.items()[0].concession_name, "POPCORN_REG");
    assert_eq!(tracker.items()[0].display_price, "QAR 15.00");

    // The decoy's control was never touched.
    assert_eq!(page.click_count(&decoy_add), 0);
    assert_eq!(page.click_count(&fixture.add), 1);
}

#[tokio::test]
async fn test_add_plain_absent_item_fails_with_match_count() {
    init_tracing();
    let config = fast_config();
    let page = ScriptedPage::new();
    let item = plain_item("Ghost Item", 1000);

    let mut tracker = OrderTracker::new();
    let mut flow = OrderFlow::seeded(&page, &config, 11);
    let err = flow.add_plain(&item, &mut tracker).await.unwrap_err();

    match err {
        EngineError::Resolution { candidates, .. } => assert_eq!(candidates, 0),
        other => panic!("expected resolution error, got {other}"),
    }
    assert!(tracker.is_empty());
}

#[tokio::test]
async fn test_resolver_refuses_when_no_price_matches() {
    init_tracing();
    let config = fast_config();
    let page = ScriptedPage::new();
    let item = plain_item("Popcorn Regular", 1500);

    // Two name matches, both at the wrong price.
    install_decoy(&page, &item.name, "QAR 17.00", &config.add_label);
    install_decoy(&page, &item.name, "QAR 18.00", &config.add_label);

    let mut tracker = OrderTracker::new();
    let mut flow = OrderFlow::seeded(&page, &config, 11);
    let err = flow.add_plain(&item, &mut tracker).await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Popcorn Regular"), "message: {message}");
    assert!(message.contains("15.00"), "message: {message}");
    assert!(message.contains("2 raw name match(es)"), "message: {message}");
    assert!(tracker.is_empty());
}

#[tokio::test]
async fn test_add_plain_resolves_renamed_card_by_significant_word() {
    init_tracing();
    let config = fast_config();
    let page = ScriptedPage::new();

    // Catalog still carries the old name; the card was renamed but kept the
    // leading word and the price.
    let item = plain_item("Popcorn Supreme Tub", 1600);
    let mut on_screen = item.clone();
    on_screen.name = "Popcorn XL Tub".to_string();
    let fixture = install_card(&page, &on_screen, &config);

    let mut tracker = OrderTracker::new();
    let mut flow = OrderFlow::seeded(&page, &config, 11);
    flow.add_plain(&item, &mut tracker).await.unwrap();

    assert_eq!(page.click_count(&fixture.add), 1);
    // The tracker keeps the catalog's identifying name.
    assert_eq!(tracker.items()[0].name, "Popcorn Supreme Tub");
}

#[tokio::test]
async fn test_add_plain_without_quantity_control_is_fatal() {
    init_tracing();
    let config = fast_config();
    let page = ScriptedPage::new();
    let item = plain_item("Nachos", 900);

    // A bare card with no stepper, no "+" button, no quantity attribute.
    install_decoy(&page, &item.name, &config.display_price(item.price), &config.add_label);

    let mut tracker = OrderTracker::new();
    let mut flow = OrderFlow::seeded(&page, &config, 11);
    let err = flow.add_plain(&item, &mut tracker).await.unwrap_err();

    assert!(matches!(err, EngineError::StepperMissing { .. }));
    assert!(tracker.is_empty());
}

#[tokio::test]
async fn test_add_modified_selects_exactly_the_minimum() {
    init_tracing();
    let config = fast_config();
    let page = ScriptedPage::new();

    let catalog = sample_catalog();
    let classified = classify(&catalog);
    let combo = classified.require(ItemShape::Modified).unwrap();
    let fixture = install_card(&page, combo, &config);

    let mut tracker = OrderTracker::new();
    let mut flow = OrderFlow::seeded(&page, &config, 42);
    flow.add_modified(combo, &mut tracker).await.unwrap();

    // Exactly minimum_quantity selections were committed across the group's
    // controls.
    let committed: u32 = fixture
        .option_controls
        .iter()
        .map(|control| page.interaction_count(control))
        .sum();
    assert_eq!(committed, 2);
    assert_eq!(page.click_count(fixture.confirm.as_ref().unwrap()), 1);

    assert_eq!(tracker.len(), 1);
    assert_eq!(tracker.total_price(), Money::from_cents(2500));
    assert_eq!(tracker.items()[0].concession_name, "COMBO_MEAL");
}

#[tokio::test]
async fn test_modifier_shortfall_names_group_and_counts() {
    init_tracing();
    let config = fast_config();
    let page = ScriptedPage::new();

    // One candidate that succeeds once, then breaks: 1 out of 2.
    let item = CatalogItem {
        name: "Combo Meal".to_string(),
        concession_name: "COMBO_MEAL".to_string(),
        price: Money::from_cents(2500),
        modifier_groups: vec![ModifierGroup {
            name: "Sides".to_string(),
            minimum_quantity: 2,
            maximum_quantity: 2,
            items: vec![ModifierItem {
                id: Some("41".to_string()),
                name: "Fries".to_string(),
            }],
        }],
        alternates: Vec::new(),
    };

    // Hand-built card: the option control exists but has no text label, so
    // once it breaks there is no fallback path left.
    let section = page.add(foyer_e2e::ElementSpec::container());
    let card = page.add(foyer_e2e::ElementSpec::container().under(&section));
    page.add(foyer_e2e::ElementSpec::text(&item.name).under(&card));
    page.add(foyer_e2e::ElementSpec::text(&config.display_price(item.price)).under(&card));
    page.add(foyer_e2e::ElementSpec::button(&config.add_label).under(&card));
    let checkbox = page.add(
        foyer_e2e::ElementSpec::checkbox("Fries")
            .with_dom_id("41")
            .under(&card),
    );
    page.fail_interactions_after(&checkbox, 1);

    let mut tracker = OrderTracker::new();
    let mut flow = OrderFlow::seeded(&page, &config, 42);
    let err = flow.add_modified(&item, &mut tracker).await.unwrap_err();

    match &err {
        EngineError::ModifierShortfall {
            group,
            selected,
            required,
        } => {
            assert_eq!(group, "Sides");
            assert_eq!((*selected, *required), (1, 2));
        }
        other => panic!("expected shortfall, got {other}"),
    }
    assert!(err.to_string().contains("'Sides'"));
    assert!(err.to_string().contains("1 out of 2"));

    // Nothing was committed to the tracker.
    assert!(tracker.is_empty());
}

#[tokio::test]
async fn test_empty_modifier_group_is_skipped() {
    init_tracing();
    let config = fast_config();
    let page = ScriptedPage::new();

    let mut item = plain_item("Combo Meal", 2500);
    item.modifier_groups.push(ModifierGroup {
        name: "Extras".to_string(),
        minimum_quantity: 1,
        maximum_quantity: 1,
        items: Vec::new(),
    });

    let fixture = install_card(&page, &item, &config);

    let mut tracker = OrderTracker::new();
    let mut flow = OrderFlow::seeded(&page, &config, 42);
    flow.add_modified(&item, &mut tracker).await.unwrap();

    assert_eq!(tracker.len(), 1);
    let committed: u32 = fixture
        .option_controls
        .iter()
        .map(|control| page.interaction_count(control))
        .sum();
    assert_eq!(committed, 0);
}

#[tokio::test]
async fn test_add_alternated_uses_alternate_price() {
    init_tracing();
    let config = fast_config();
    let page = ScriptedPage::new();

    let catalog = sample_catalog();
    let classified = classify(&catalog);
    let soda = classified.require(ItemShape::Alternated).unwrap();
    let fixture = install_card(&page, soda, &config);

    let mut tracker = OrderTracker::new();
    let mut flow = OrderFlow::seeded(&page, &config, 7);
    flow.add_alternated(soda, &mut tracker).await.unwrap();

    let line = &tracker.items()[0];
    assert_eq!(line.name, "Soda - Soda Large");
    assert_eq!(line.price, Money::from_cents(1200));
    assert_eq!(line.concession_name, "Soda Large");
    // The base price never reaches the tracker.
    assert_eq!(tracker.total_price(), Money::from_cents(1200));

    assert!(page.is_checked(&fixture.option_controls[0]));
}

#[tokio::test]
async fn test_add_alternated_without_id_falls_back_to_name() {
    init_tracing();
    let config = fast_config();
    let page = ScriptedPage::new();

    let item = CatalogItem {
        name: "Soda".to_string(),
        concession_name: "SODA_REG".to_string(),
        price: Money::from_cents(800),
        modifier_groups: Vec::new(),
        alternates: vec![AlternateItem {
            id: None,
            name: "Soda Large".to_string(),
            price: Money::from_cents(1200),
        }],
    };

    install_card(&page, &item, &config);

    let mut tracker = OrderTracker::new();
    let mut flow = OrderFlow::seeded(&page, &config, 7);
    flow.add_alternated(&item, &mut tracker).await.unwrap();

    assert_eq!(tracker.items()[0].price, Money::from_cents(1200));
}

#[tokio::test]
async fn test_tracker_total_sums_across_shapes() {
    init_tracing();
    let config = fast_config();
    let page = ScriptedPage::new();

    let catalog = sample_catalog();
    let classified = classify(&catalog);
    let popcorn = classified.require(ItemShape::Plain).unwrap();
    let combo = classified.require(ItemShape::Modified).unwrap();
    let soda = classified.require(ItemShape::Alternated).unwrap();

    install_card(&page, popcorn, &config);
    install_card(&page, combo, &config);
    install_card(&page, soda, &config);

    let mut tracker = OrderTracker::new();
    let mut flow = OrderFlow::seeded(&page, &config, 99);
    flow.add_plain(popcorn, &mut tracker).await.unwrap();
    flow.add_modified(combo, &mut tracker).await.unwrap();
    flow.add_alternated(soda, &mut tracker).await.unwrap();

    // 15.00 + 25.00 + 12.00 (alternate, not base)
    assert_eq!(tracker.total_price(), Money::from_cents(5200));
    assert_eq!(tracker.len(), 3);
}
