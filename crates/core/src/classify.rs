//! Item classification
//!
//! Partitions catalog items into three disjoint shapes based on which
//! optional structures they carry. Alternates are checked before modifier
//! groups; an item carrying both classifies as alternated.

use std::fmt;

use crate::catalog::{Catalog, CatalogItem};
use crate::error::{CoreError, CoreResult};

/// The structural shape of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemShape {
    /// No modifier groups and no alternates
    Plain,
    /// At least one modifier group
    Modified,
    /// At least one alternate item
    Alternated,
}

impl fmt::Display for ItemShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemShape::Plain => write!(f, "plain"),
            ItemShape::Modified => write!(f, "modified"),
            ItemShape::Alternated => write!(f, "alternated"),
        }
    }
}

/// Catalog items partitioned by shape.
#[derive(Debug, Clone, Default)]
pub struct Classified {
    pub plain: Vec<CatalogItem>,
    pub modified: Vec<CatalogItem>,
    pub alternated: Vec<CatalogItem>,
}

impl Classified {
    /// All items of the given shape, in catalog order.
    pub fn bucket(&self, shape: ItemShape) -> &[CatalogItem] {
        match shape {
            ItemShape::Plain => &self.plain,
            ItemShape::Modified => &self.modified,
            ItemShape::Alternated => &self.alternated,
        }
    }

    /// First item of the given shape, or a fatal error when the scenario
    /// needs a shape the catalog does not offer.
    pub fn require(&self, shape: ItemShape) -> CoreResult<&CatalogItem> {
        self.bucket(shape)
            .first()
            .ok_or(CoreError::EmptyBucket { shape })
    }
}

/// Determine the shape of a single item.
pub fn shape_of(item: &CatalogItem) -> ItemShape {
    if !item.alternates.is_empty() {
        ItemShape::Alternated
    } else if !item.modifier_groups.is_empty() {
        ItemShape::Modified
    } else {
        ItemShape::Plain
    }
}

/// Partition every catalog item into exactly one bucket.
pub fn classify(catalog: &Catalog) -> Classified {
    let mut out = Classified::default();

    for item in catalog.items() {
        match shape_of(item) {
            ItemShape::Alternated => out.alternated.push(item.clone()),
            ItemShape::Modified => out.modified.push(item.clone()),
            ItemShape::Plain => out.plain.push(item.clone()),
        }
    }

    out
}
