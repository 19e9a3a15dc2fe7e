//! Catalog acquisition
//!
//! The host application owns transport; the engine only consumes a
//! GET-style fetch capability and parses what comes back. The catalog is
//! fetched once per scenario and immutable from then on.

use async_trait::async_trait;

use foyer_core::Catalog;

use crate::error::EngineResult;

/// The catalog-fetch capability the host provides.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// One menu fetch, returning the raw response body.
    async fn fetch_menu(&self) -> EngineResult<serde_json::Value>;
}

/// Fetch and parse the scenario's catalog.
pub async fn load_catalog<C: CatalogSource + ?Sized>(source: &C) -> EngineResult<Catalog> {
    let body = source.fetch_menu().await?;
    Ok(Catalog::from_value(body)?)
}
