//! Abstract page-interaction surface
//!
//! The engine never talks to a concrete browser. It consumes this capability
//! set and assumes nothing about markup beyond "an ancestor container groups
//! a name, a price, and an action control". Production scenarios back it
//! with a real automation session; tests back it with a scripted page.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using the surface error
pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

/// Errors surfaced by a page-interaction backend.
///
/// A bounded wait that runs out surfaces as [`SurfaceError::Timeout`]; call
/// sites decide explicitly whether that is fatal or degradable.
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("timeout after {millis}ms waiting for {what}")]
    Timeout { what: String, millis: u64 },

    #[error("node no longer attached: {0}")]
    Detached(NodeHandle),

    #[error("interaction failed: {0}")]
    Interaction(String),
}

/// Opaque handle to one on-screen node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub u64);

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Text-matching pattern understood by every surface backend.
#[derive(Debug, Clone)]
pub enum TextPattern {
    /// Case-insensitive substring match
    Contains(String),
    /// Regular expression match (applied case-insensitively)
    Regex(String),
}

impl TextPattern {
    /// Evaluate this pattern against a node's text. Shared by backends so
    /// that matching semantics cannot drift between production and tests.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            TextPattern::Contains(needle) => {
                text.to_lowercase().contains(&needle.to_lowercase())
            }
            TextPattern::Regex(pattern) => regex::Regex::new(&format!("(?i){}", pattern))
                .map(|re| re.is_match(text))
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for TextPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextPattern::Contains(s) => write!(f, "text containing '{}'", s),
            TextPattern::Regex(s) => write!(f, "text matching /{}/", s),
        }
    }
}

/// Control role, in the accessibility-tree sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Button,
    Checkbox,
    Radio,
    Spinbutton,
    Textbox,
}

/// Predicate for capturing a network exchange.
#[derive(Debug, Clone)]
pub struct RequestMatcher {
    pub method: String,
    pub url_fragment: String,
}

impl RequestMatcher {
    pub fn post(url_fragment: &str) -> Self {
        Self {
            method: "POST".to_string(),
            url_fragment: url_fragment.to_string(),
        }
    }
}

/// One captured request/response pair.
#[derive(Debug, Clone)]
pub struct CapturedExchange {
    pub url: String,
    pub method: String,
    pub request_body: serde_json::Value,
    pub response_body: Option<serde_json::Value>,
}

/// The page-interaction capability set the engine consumes.
///
/// All operations are asynchronous but callers issue them strictly
/// sequentially; a scenario owns its surface session exclusively.
#[async_trait]
pub trait PageSurface: Send + Sync {
    /// All nodes whose own text matches the pattern, in document order.
    async fn find_by_text(&self, pattern: &TextPattern) -> SurfaceResult<Vec<NodeHandle>>;

    /// Exact control lookup by id.
    async fn find_by_id(&self, id: &str) -> SurfaceResult<Option<NodeHandle>>;

    /// Nodes with the given role, optionally filtered by accessible name.
    async fn find_by_role(
        &self,
        role: Role,
        name: Option<&TextPattern>,
    ) -> SurfaceResult<Vec<NodeHandle>>;

    /// Like [`PageSurface::find_by_text`], scoped to a container's subtree.
    async fn find_text_within(
        &self,
        scope: &NodeHandle,
        pattern: &TextPattern,
    ) -> SurfaceResult<Vec<NodeHandle>>;

    /// Like [`PageSurface::find_by_role`], scoped to a container's subtree.
    async fn find_role_within(
        &self,
        scope: &NodeHandle,
        role: Role,
        name: Option<&TextPattern>,
    ) -> SurfaceResult<Vec<NodeHandle>>;

    async fn click(&self, node: &NodeHandle) -> SurfaceResult<()>;

    async fn fill(&self, node: &NodeHandle, value: &str) -> SurfaceResult<()>;

    async fn check(&self, node: &NodeHandle) -> SurfaceResult<()>;

    async fn read_attribute(
        &self,
        node: &NodeHandle,
        name: &str,
    ) -> SurfaceResult<Option<String>>;

    /// Combined text of the node and its subtree.
    async fn inner_text(&self, node: &NodeHandle) -> SurfaceResult<String>;

    async fn is_visible(&self, node: &NodeHandle) -> SurfaceResult<bool>;

    /// Structural parent, or None at the document root.
    async fn parent(&self, node: &NodeHandle) -> SurfaceResult<Option<NodeHandle>>;

    /// Bounded wait for a node to become visible.
    async fn wait_for_visible(&self, node: &NodeHandle, timeout: Duration) -> SurfaceResult<()>;

    /// Bounded wait for a network exchange matching the predicate.
    async fn wait_for_network(
        &self,
        matcher: &RequestMatcher,
        timeout: Duration,
    ) -> SurfaceResult<CapturedExchange>;
}
