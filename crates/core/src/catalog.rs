//! Concession catalog model
//!
//! Parses the raw menu response (`{ data: [ { name, ConcessionItems } ] }`)
//! into typed, immutable catalog records. Absent and empty optional arrays
//! are treated the same; nothing here errors on structurally missing fields.

use serde::Deserialize;

use crate::error::CoreResult;
use crate::money::Money;

/// A parsed concession catalog, immutable for the scenario's duration.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub categories: Vec<CatalogCategory>,
}

/// One named catalog category with its items in menu order.
#[derive(Debug, Clone)]
pub struct CatalogCategory {
    pub name: String,
    pub items: Vec<CatalogItem>,
}

/// A purchasable F&B item.
#[derive(Debug, Clone)]
pub struct CatalogItem {
    /// Human-readable identifying name shown on the card
    pub name: String,
    /// Canonical concession name used for reconciliation lookups
    pub concession_name: String,
    /// Unit price
    pub price: Money,
    pub modifier_groups: Vec<ModifierGroup>,
    pub alternates: Vec<AlternateItem>,
}

/// A named set of modifier choices with a required selection count.
#[derive(Debug, Clone)]
pub struct ModifierGroup {
    pub name: String,
    pub minimum_quantity: u32,
    pub maximum_quantity: u32,
    pub items: Vec<ModifierItem>,
}

/// One selectable modifier choice.
#[derive(Debug, Clone)]
pub struct ModifierItem {
    /// Control id, preferred for exact on-screen matching
    pub id: Option<String>,
    pub name: String,
}

/// A substitute product offered in place of the base item.
///
/// Alternates are substitutions, not modifiers: their price replaces the
/// base item's price entirely.
#[derive(Debug, Clone)]
pub struct AlternateItem {
    pub id: Option<String>,
    pub name: String,
    pub price: Money,
}

impl Catalog {
    /// Parse a catalog from a raw response body.
    pub fn parse(body: &str) -> CoreResult<Self> {
        let resp: CatalogResponse = serde_json::from_str(body)?;
        Ok(Self::from_response(resp))
    }

    /// Parse a catalog from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> CoreResult<Self> {
        let resp: CatalogResponse = serde_json::from_value(value)?;
        Ok(Self::from_response(resp))
    }

    fn from_response(resp: CatalogResponse) -> Self {
        Catalog {
            categories: resp
                .data
                .into_iter()
                .map(|cat| CatalogCategory {
                    name: cat.name,
                    items: cat.concession_items.into_iter().map(CatalogItem::from).collect(),
                })
                .collect(),
        }
    }

    /// Iterate all items across categories in menu order.
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }
}

impl From<WireItem> for CatalogItem {
    fn from(wire: WireItem) -> Self {
        // Identifying name falls back extended_description -> display_name
        // -> internal concession name.
        let name = wire
            .extended_description
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| wire.display_name.clone().filter(|s| !s.trim().is_empty()))
            .or_else(|| wire.concession_item_name.clone())
            .unwrap_or_default();

        let concession_name = wire.concession_item_name.unwrap_or_else(|| name.clone());

        CatalogItem {
            name,
            concession_name,
            price: Money::from_cents(wire.price_in_cents),
            modifier_groups: wire.modifier_groups.into_iter().map(ModifierGroup::from).collect(),
            alternates: wire.alternate_items.into_iter().map(AlternateItem::from).collect(),
        }
    }
}

impl From<WireModifierGroup> for ModifierGroup {
    fn from(wire: WireModifierGroup) -> Self {
        ModifierGroup {
            name: wire.display_name.unwrap_or_default(),
            minimum_quantity: wire.minimum_quantity,
            maximum_quantity: wire.maximum_quantity.unwrap_or(1),
            items: wire.modifier_items.into_iter().map(ModifierItem::from).collect(),
        }
    }
}

impl From<WireChoice> for ModifierItem {
    fn from(wire: WireChoice) -> Self {
        ModifierItem {
            id: wire.id,
            name: wire.display_name.unwrap_or_default(),
        }
    }
}

impl From<WireChoice> for AlternateItem {
    fn from(wire: WireChoice) -> Self {
        AlternateItem {
            price: Money::from_cents(wire.price_in_cents),
            id: wire.id,
            name: wire.display_name.unwrap_or_default(),
        }
    }
}

// Wire-format structs matching the raw menu response casing.

#[derive(Debug, Clone, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    data: Vec<WireCategory>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireCategory {
    #[serde(default)]
    name: String,
    #[serde(rename = "ConcessionItems", default)]
    concession_items: Vec<WireItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireItem {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    extended_description: Option<String>,
    #[serde(default)]
    concession_item_name: Option<String>,
    #[serde(default)]
    price_in_cents: i64,
    #[serde(rename = "ModifierGroups", default)]
    modifier_groups: Vec<WireModifierGroup>,
    #[serde(rename = "AlternateItems", default)]
    alternate_items: Vec<WireChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireModifierGroup {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    minimum_quantity: u32,
    #[serde(default)]
    maximum_quantity: Option<u32>,
    #[serde(rename = "ModifierItems", default)]
    modifier_items: Vec<WireChoice>,
}

/// Shared wire shape for modifier and alternate entries.
#[derive(Debug, Clone, Deserialize)]
struct WireChoice {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    price_in_cents: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_catalog() {
        let body = r#"{
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
                }
            ]
        }"#;

        let catalog = Catalog::parse(body).unwrap();
        assert_eq!(catalog.categories.len(), 1);
        assert_eq!(catalog.categories[0].name, "Snacks");

        let item = &catalog.categories[0].items[0];
        assert_eq!(item.name, "Popcorn Regular");
        assert_eq!(item.concession_name, "POPCORN_REG");
        assert_eq!(item.price, Money::from_cents(1500));
        assert!(item.modifier_groups.is_empty());
        assert!(item.alternates.is_empty());
    }

    #[test]
    fn test_name_fallback_chain() {
        let body = r#"{
            "data": [
                {
                    "name": "Drinks",
                    "ConcessionItems": [
                        {
                            "extended_description": "Large Soda with Ice",
                            "display_name": "Soda",
                            "concession_item_name": "SODA_L",
                            "price_in_cents": 800
                        },
                        {
                            "display_name": "Water",
                            "price_in_cents": 300
                        },
                        {
                            "concession_item_name": "COFFEE",
                            "price_in_cents": 450
                        }
                    ]
                }
            ]
        }"#;

        let catalog = Catalog::parse(body).unwrap();
        let items = &catalog.categories[0].items;
        assert_eq!(items[0].name, "Large Soda with Ice");
        assert_eq!(items[1].name, "Water");
        // No wire concession name: canonical falls back to the display name
        assert_eq!(items[1].concession_name, "Water");
        assert_eq!(items[2].name, "COFFEE");
    }

    #[test]
    fn test_modifier_group_defaults() {
        let body = r#"{
            "data": [
                {
                    "name": "Combos",
                    "ConcessionItems": [
                        {
                            "display_name": "Combo Meal",
                            "price_in_cents": 2500,
                            "ModifierGroups": [
                                {
                                    "display_name": "Size",
                                    "minimum_quantity": 1,
                                    "ModifierItems": [
                                        { "id": "41", "display_name": "Medium" },
                                        { "display_name": "Large" }
                                    ]
                                }
                            ]
                        }
                    ]
                }
            ]
        }"#;

        let catalog = Catalog::parse(body).unwrap();
        let group = &catalog.categories[0].items[0].modifier_groups[0];
        assert_eq!(group.name, "Size");
        assert_eq!(group.minimum_quantity, 1);
        // maximum_quantity absent on the wire defaults to 1
        assert_eq!(group.maximum_quantity, 1);
        assert_eq!(group.items[0].id.as_deref(), Some("41"));
        assert_eq!(group.items[1].id, None);
    }

    #[test]
    fn test_alternate_carries_own_price() {
        let body = r#"{
            "data": [
                {
                    "name": "Drinks",
                    "ConcessionItems": [
                        {
                            "display_name": "Soda",
                            "price_in_cents": 800,
                            "AlternateItems": [
                                { "id": "7", "display_name": "Soda Large", "price_in_cents": 1200 }
                            ]
                        }
                    ]
                }
            ]
        }"#;

        let catalog = Catalog::parse(body).unwrap();
        let item = &catalog.categories[0].items[0];
        assert_eq!(item.price, Money::from_cents(800));
        assert_eq!(item.alternates[0].price, Money::from_cents(1200));
    }

    #[test]
    fn test_empty_response() {
        let catalog = Catalog::parse(r#"{ "data": [] }"#).unwrap();
        assert_eq!(catalog.items().count(), 0);
    }
}
