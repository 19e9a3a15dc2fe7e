//! Scripted in-memory page surface
//!
//! A small node tree standing in for the host UI. Nodes carry the things the
//! engine is allowed to observe (own text, role, accessible name, id,
//! attributes, visibility, ancestry) plus scripting hooks: click-reveals,
//! interaction-failure injection, and a queue of captured network exchanges.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use foyer_engine::surface::{
    CapturedExchange, NodeHandle, PageSurface, RequestMatcher, Role, SurfaceError, SurfaceResult,
    TextPattern,
};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Debug, Clone)]
struct Node {
    parent: Option<u64>,
    dom_id: Option<String>,
    role: Option<Role>,
    name: String,
    text: String,
    visible: bool,
    checked: bool,
    value: String,
    attributes: HashMap<String, String>,
    /// Successful interactions allowed before injected failures; None means
    /// never fail
    fail_after: Option<u32>,
    interactions: u32,
    clicks: u32,
    /// Nodes made visible when this one is clicked
    reveals: Vec<u64>,
}

#[derive(Default)]
struct PageState {
    nodes: HashMap<u64, Node>,
    order: Vec<u64>,
    next_id: u64,
    exchanges: Vec<CapturedExchange>,
}

/// Scripted page backing the engine's surface contract in tests.
#[derive(Default)]
pub struct ScriptedPage {
    state: Mutex<PageState>,
}

/// Declarative description of one node to install on the page.
#[derive(Debug, Clone)]
pub struct ElementSpec {
    parent: Option<u64>,
    dom_id: Option<String>,
    role: Option<Role>,
    name: String,
    text: String,
    visible: bool,
    attributes: Vec<(String, String)>,
}

impl ElementSpec {
    fn new() -> Self {
        Self {
            parent: None,
            dom_id: None,
            role: None,
            name: String::new(),
            text: String::new(),
            visible: true,
            attributes: Vec::new(),
        }
    }

    /// A structural container with no text of its own.
    pub fn container() -> Self {
        Self::new()
    }

    /// A text node.
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::new()
        }
    }

    pub fn button(name: &str) -> Self {
        Self {
            role: Some(Role::Button),
            name: name.to_string(),
            ..Self::new()
        }
    }

    pub fn checkbox(name: &str) -> Self {
        Self {
            role: Some(Role::Checkbox),
            name: name.to_string(),
            ..Self::new()
        }
    }

    pub fn radio(name: &str) -> Self {
        Self {
            role: Some(Role::Radio),
            name: name.to_string(),
            ..Self::new()
        }
    }

    pub fn spinbutton() -> Self {
        Self {
            role: Some(Role::Spinbutton),
            ..Self::new()
        }
    }

    pub fn textbox(name: &str) -> Self {
        Self {
            role: Some(Role::Textbox),
            name: name.to_string(),
            ..Self::new()
        }
    }

    pub fn under(mut self, parent: &NodeHandle) -> Self {
        self.parent = Some(parent.0);
        self
    }

    pub fn with_dom_id(mut self, id: &str) -> Self {
        self.dom_id = Some(id.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }
}

impl ScriptedPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a node and return its handle.
    pub fn add(&self, spec: ElementSpec) -> NodeHandle {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;

        state.nodes.insert(
            id,
            Node {
                parent: spec.parent,
                dom_id: spec.dom_id,
                role: spec.role,
                name: spec.name,
                text: spec.text,
                visible: spec.visible,
                checked: false,
                value: String::new(),
                attributes: spec.attributes.into_iter().collect(),
                fail_after: None,
                interactions: 0,
                clicks: 0,
                reveals: Vec::new(),
            },
        );
        state.order.push(id);
        NodeHandle(id)
    }

    /// Clicking `trigger` makes `target` visible.
    pub fn reveal_on_click(&self, trigger: &NodeHandle, target: &NodeHandle) {
        let mut state = self.lock();
        if let Some(node) = state.nodes.get_mut(&trigger.0) {
            node.reveals.push(target.0);
        }
    }

    pub fn set_visible(&self, node: &NodeHandle, visible: bool) {
        let mut state = self.lock();
        if let Some(node) = state.nodes.get_mut(&node.0) {
            node.visible = visible;
        }
    }

    /// Interactions with `node` fail after `successes` successful ones.
    pub fn fail_interactions_after(&self, node: &NodeHandle, successes: u32) {
        let mut state = self.lock();
        if let Some(node) = state.nodes.get_mut(&node.0) {
            node.fail_after = Some(successes);
        }
    }

    /// Queue a network exchange for a later wait_for_network.
    pub fn push_exchange(&self, exchange: CapturedExchange) {
        self.lock().exchanges.push(exchange);
    }

    pub fn click_count(&self, node: &NodeHandle) -> u32 {
        self.lock().nodes.get(&node.0).map_or(0, |n| n.clicks)
    }

    /// Successful interactions of any kind (click, fill, check).
    pub fn interaction_count(&self, node: &NodeHandle) -> u32 {
        self.lock().nodes.get(&node.0).map_or(0, |n| n.interactions)
    }

    pub fn is_checked(&self, node: &NodeHandle) -> bool {
        self.lock().nodes.get(&node.0).map_or(false, |n| n.checked)
    }

    pub fn value_of(&self, node: &NodeHandle) -> String {
        self.lock()
            .nodes
            .get(&node.0)
            .map_or_else(String::new, |n| n.value.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PageState> {
        self.state.lock().expect("page state poisoned")
    }
}

impl PageState {
    fn node(&self, handle: &NodeHandle) -> SurfaceResult<&Node> {
        self.nodes
            .get(&handle.0)
            .ok_or_else(|| SurfaceError::Detached(handle.clone()))
    }

    /// Visible iff the node and every ancestor is visible.
    fn effectively_visible(&self, id: u64) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            match self.nodes.get(&id) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    fn is_descendant(&self, scope: u64, id: u64) -> bool {
        let mut current = self.nodes.get(&id).and_then(|n| n.parent);
        while let Some(parent) = current {
            if parent == scope {
                return true;
            }
            current = self.nodes.get(&parent).and_then(|n| n.parent);
        }
        false
    }

    fn find_nodes<F: Fn(&Node) -> bool>(&self, scope: Option<u64>, accept: F) -> Vec<NodeHandle> {
        self.order
            .iter()
            .copied()
            .filter(|id| scope.map_or(true, |scope| self.is_descendant(scope, *id)))
            .filter(|id| self.nodes.get(id).map_or(false, |n| accept(n)))
            .map(NodeHandle)
            .collect()
    }

    /// One successful interaction, or an injected failure.
    fn interact(&mut self, handle: &NodeHandle) -> SurfaceResult<&mut Node> {
        let node = self
            .nodes
            .get_mut(&handle.0)
            .ok_or_else(|| SurfaceError::Detached(handle.clone()))?;

        if let Some(budget) = node.fail_after {
            if node.interactions >= budget {
                return Err(SurfaceError::Interaction(format!(
                    "scripted failure for {}",
                    handle
                )));
            }
        }
        node.interactions += 1;
        Ok(node)
    }
}

#[async_trait]
impl PageSurface for ScriptedPage {
    async fn find_by_text(&self, pattern: &TextPattern) -> SurfaceResult<Vec<NodeHandle>> {
        let state = self.lock();
        Ok(state.find_nodes(None, |n| !n.text.is_empty() && pattern.matches(&n.text)))
    }

    async fn find_by_id(&self, id: &str) -> SurfaceResult<Option<NodeHandle>> {
        let state = self.lock();
        Ok(state
            .order
            .iter()
            .copied()
            .find(|node_id| {
                state
                    .nodes
                    .get(node_id)
                    .map_or(false, |n| n.dom_id.as_deref() == Some(id))
            })
            .map(NodeHandle))
    }

    async fn find_by_role(
        &self,
        role: Role,
        name: Option<&TextPattern>,
    ) -> SurfaceResult<Vec<NodeHandle>> {
        let state = self.lock();
        Ok(state.find_nodes(None, |n| {
            n.role == Some(role) && name.map_or(true, |p| p.matches(&n.name))
        }))
    }

    async fn find_text_within(
        &self,
        scope: &NodeHandle,
        pattern: &TextPattern,
    ) -> SurfaceResult<Vec<NodeHandle>> {
        let state = self.lock();
        state.node(scope)?;
        Ok(state.find_nodes(Some(scope.0), |n| {
            !n.text.is_empty() && pattern.matches(&n.text)
        }))
    }

    async fn find_role_within(
        &self,
        scope: &NodeHandle,
        role: Role,
        name: Option<&TextPattern>,
    ) -> SurfaceResult<Vec<NodeHandle>> {
        let state = self.lock();
        state.node(scope)?;
        Ok(state.find_nodes(Some(scope.0), |n| {
            n.role == Some(role) && name.map_or(true, |p| p.matches(&n.name))
        }))
    }

    async fn click(&self, node: &NodeHandle) -> SurfaceResult<()> {
        let mut state = self.lock();
        let clicked = state.interact(node)?;
        clicked.clicks += 1;
        let reveals = clicked.reveals.clone();
        for id in reveals {
            if let Some(target) = state.nodes.get_mut(&id) {
                target.visible = true;
            }
        }
        Ok(())
    }

    async fn fill(&self, node: &NodeHandle, value: &str) -> SurfaceResult<()> {
        let mut state = self.lock();
        state.interact(node)?.value = value.to_string();
        Ok(())
    }

    async fn check(&self, node: &NodeHandle) -> SurfaceResult<()> {
        let mut state = self.lock();
        state.interact(node)?.checked = true;
        Ok(())
    }

    async fn read_attribute(
        &self,
        node: &NodeHandle,
        name: &str,
    ) -> SurfaceResult<Option<String>> {
        let state = self.lock();
        Ok(state.node(node)?.attributes.get(name).cloned())
    }

    async fn inner_text(&self, node: &NodeHandle) -> SurfaceResult<String> {
        let state = self.lock();
        let own = state.node(node)?.text.clone();

        let mut parts: Vec<String> = Vec::new();
        if !own.is_empty() {
            parts.push(own);
        }
        for id in &state.order {
            if state.is_descendant(node.0, *id) {
                if let Some(descendant) = state.nodes.get(id) {
                    if !descendant.text.is_empty() {
                        parts.push(descendant.text.clone());
                    }
                }
            }
        }
        Ok(parts.join("\n"))
    }

    async fn is_visible(&self, node: &NodeHandle) -> SurfaceResult<bool> {
        let state = self.lock();
        state.node(node)?;
        Ok(state.effectively_visible(node.0))
    }

    async fn parent(&self, node: &NodeHandle) -> SurfaceResult<Option<NodeHandle>> {
        let state = self.lock();
        Ok(state.node(node)?.parent.map(NodeHandle))
    }

    async fn wait_for_visible(&self, node: &NodeHandle, timeout: Duration) -> SurfaceResult<()> {
        let start = Instant::now();
        loop {
            {
                let state = self.lock();
                state.node(node)?;
                if state.effectively_visible(node.0) {
                    return Ok(());
                }
            }
            if start.elapsed() >= timeout {
                return Err(SurfaceError::Timeout {
                    what: node.to_string(),
                    millis: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_for_network(
        &self,
        matcher: &RequestMatcher,
        timeout: Duration,
    ) -> SurfaceResult<CapturedExchange> {
        let start = Instant::now();
        loop {
            {
                let state = self.lock();
                let found = state.exchanges.iter().find(|exchange| {
                    exchange.method.eq_ignore_ascii_case(&matcher.method)
                        && exchange.url.contains(&matcher.url_fragment)
                });
                if let Some(exchange) = found {
                    return Ok(exchange.clone());
                }
            }
            if start.elapsed() >= timeout {
                return Err(SurfaceError::Timeout {
                    what: format!("{} {}", matcher.method, matcher.url_fragment),
                    millis: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
