//! Foyer Order Engine
//!
//! The interactive half of the F&B order subsystem: resolves ambiguous
//! on-screen item cards, satisfies modifier-group constraints, substitutes
//! alternates, and reconciles the scenario's order ledger against the host
//! UI and the checkout payload.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Scenario code (caller)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  OrderFlow                                                  │
//! │    ├── add_plain(item, &mut tracker)                        │
//! │    ├── add_modified(item, &mut tracker)                     │
//! │    └── add_alternated(item, &mut tracker)                   │
//! │         │                                                   │
//! │         ├── ElementResolver: name → price-verified card     │
//! │         ├── ChoiceSelector: modifier groups / alternates    │
//! │         └── soft quantity-control check                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Reconciler::check_cart   ── tracker vs on-screen cart      │
//! │  check_payload            ── tracker vs CheckoutCapture     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PageSurface (abstract)   ── the only way to touch the UI   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod checkout;
pub mod config;
pub mod error;
pub mod flow;
pub mod menu;
pub mod reconcile;
pub mod resolve;
pub mod selector;
pub mod surface;
pub mod wait;

pub use checkout::{CheckoutCapture, ConcessionLine};
pub use config::{EngineConfig, ResolverConfig, SelectorConfig};
pub use error::{EngineError, EngineResult};
pub use flow::OrderFlow;
pub use menu::{load_catalog, CatalogSource};
pub use reconcile::{check_payload, Reconciler};
pub use resolve::{ElementResolver, Resolved};
pub use selector::{ChoiceSelector, ModifierOutcome, SelectedModifier};
pub use surface::{
    CapturedExchange, NodeHandle, PageSurface, RequestMatcher, Role, SurfaceError, SurfaceResult,
    TextPattern,
};
