//! Foyer E2E Test Support
//!
//! A scripted, in-memory page surface plus catalog fixtures for exercising
//! the order engine without a browser. The scripted page implements the same
//! [`foyer_engine::PageSurface`] contract a production automation session
//! does, including failure injection and captured network exchanges, so
//! scenario tests run the real resolver/selector/reconciliation code paths.

pub mod fixtures;
pub mod page;

pub use page::{ElementSpec, ScriptedPage};

use tracing_subscriber::EnvFilter;

/// Initialize logging for tests; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
