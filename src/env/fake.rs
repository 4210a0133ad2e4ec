//! In-memory environment for unit tests.
//!
//! Elements live in a flat list in insertion order, which doubles as document
//! order. Timers run on a virtual clock advanced explicitly by the test.

use super::{
    Document, EventKind, Host, IntersectionOptions, ListenTarget, NodeId, Query, ScrollBehavior,
    ScrollMetrics, Token,
};
use crate::page::effects::{Effect, apply_effect};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeElement {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    top: f64,
    height: f64,
    parent: Option<NodeId>,
}

impl FakeElement {
    pub(crate) fn new(tag: &str) -> Self {
        FakeElement {
            tag: tag.to_string(),
            ..FakeElement::default()
        }
    }

    pub(crate) fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub(crate) fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub(crate) fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub(crate) fn geometry(mut self, top: f64, height: f64) -> Self {
        self.top = top;
        self.height = height;
        self
    }

    pub(crate) fn child_of(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }
}

pub(crate) struct FakeHost {
    nodes: Vec<FakeElement>,
    body: Option<NodeId>,
    pub(crate) metrics: ScrollMetrics,
    pub(crate) today: NaiveDate,
    now: Duration,
    timer_seq: u64,
    timers: BTreeMap<Token, (Duration, u64)>,
    frames: BTreeSet<Token>,
    listeners: BTreeMap<Token, (ListenTarget, EventKind)>,
    observers: BTreeMap<Token, (Vec<NodeId>, IntersectionOptions)>,
    pub(crate) scrolls: Vec<(f64, ScrollBehavior)>,
    pub(crate) icons_rendered: usize,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        FakeHost {
            nodes: Vec::new(),
            body: None,
            metrics: ScrollMetrics {
                scroll_y: 0.0,
                viewport_width: 1280.0,
                viewport_height: 800.0,
                document_height: 800.0,
            },
            today: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
            now: Duration::ZERO,
            timer_seq: 0,
            timers: BTreeMap::new(),
            frames: BTreeSet::new(),
            listeners: BTreeMap::new(),
            observers: BTreeMap::new(),
            scrolls: Vec::new(),
            icons_rendered: 0,
        }
    }

    pub(crate) fn add(&mut self, element: FakeElement) -> NodeId {
        self.nodes.push(element);
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn add_body(&mut self) -> NodeId {
        let body = self.add(FakeElement::new("body"));
        self.body = Some(body);
        body
    }

    pub(crate) fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.nodes.get_mut(node.0) {
            element
                .attributes
                .insert(name.to_string(), value.to_string());
        }
    }

    pub(crate) fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.get(node.0)?.styles.get(property).cloned()
    }

    pub(crate) fn text(&self, node: NodeId) -> &str {
        self.nodes
            .get(node.0)
            .map(|element| element.text.as_str())
            .unwrap_or_default()
    }

    /// Apply effects in order. Returns whether any of them prevented the
    /// default action.
    pub(crate) fn apply_all(&mut self, effects: impl IntoIterator<Item = Effect>) -> bool {
        let mut prevented = false;
        for effect in effects {
            prevented |= apply_effect(self, effect);
        }
        prevented
    }

    pub(crate) fn listeners_for(&self, target: ListenTarget, kind: EventKind) -> Vec<Token> {
        self.listeners
            .iter()
            .filter(|(_, registered)| **registered == (target, kind))
            .map(|(token, _)| *token)
            .collect()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub(crate) fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn observer_targets(&self, token: Token) -> Vec<NodeId> {
        self.observers
            .get(&token)
            .map(|(targets, _)| targets.clone())
            .unwrap_or_default()
    }

    /// Move the virtual clock forward and return the timers that came due, in
    /// firing order.
    pub(crate) fn advance(&mut self, by: Duration) -> Vec<Token> {
        self.now += by;
        let mut due: Vec<(Duration, u64, Token)> = self
            .timers
            .iter()
            .filter(|(_, (at, _))| *at <= self.now)
            .map(|(token, (at, seq))| (*at, *seq, *token))
            .collect();
        due.sort();
        for (_, _, token) in &due {
            self.timers.remove(token);
        }
        due.into_iter().map(|(_, _, token)| token).collect()
    }

    /// Hand out every pending animation frame, as the next repaint would.
    pub(crate) fn take_frames(&mut self) -> Vec<Token> {
        std::mem::take(&mut self.frames).into_iter().collect()
    }

    fn is_descendant(&self, node: NodeId, root: NodeId) -> bool {
        let mut current = self.nodes.get(node.0).and_then(|element| element.parent);
        while let Some(parent) = current {
            if parent == root {
                return true;
            }
            current = self.nodes.get(parent.0).and_then(|element| element.parent);
        }
        false
    }

    fn matches(&self, node: NodeId, element: &FakeElement, query: &Query) -> bool {
        let has = |class: &str| element.classes.iter().any(|c| c == class);
        match query {
            Query::Class(class) => has(class.as_str()),
            Query::AnyClass(classes) => classes.iter().any(|class| has(class.as_str())),
            Query::ClassWithin { root, class } => {
                has(class.as_str()) && self.is_descendant(node, *root)
            }
            Query::SectionsWithId => {
                element.tag == "section" && element.attributes.contains_key("id")
            }
            Query::FragmentLinks => {
                element.tag == "a"
                    && element
                        .attributes
                        .get("href")
                        .is_some_and(|href| href.starts_with('#'))
            }
        }
    }
}

impl Document for FakeHost {
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|element| element.attributes.get("id").map(String::as_str) == Some(id))
            .map(NodeId)
    }

    fn query_all(&self, query: &Query) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(index, element)| self.matches(NodeId(*index), element, query))
            .map(|(index, _)| NodeId(index))
            .collect()
    }

    fn body(&self) -> Option<NodeId> {
        self.body
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.get(node.0)?.attributes.get(name).cloned()
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(node.0)
            .is_some_and(|element| element.classes.iter().any(|c| c == class))
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        self.nodes.get(node.0).map_or(0.0, |element| element.top)
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.nodes.get(node.0).map_or(0.0, |element| element.height)
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

impl Host for FakeHost {
    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.nodes.get_mut(node.0) {
            if !element.classes.iter().any(|c| c == class) {
                element.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.nodes.get_mut(node.0) {
            element.classes.retain(|c| c != class);
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.nodes.get_mut(node.0) {
            element
                .styles
                .insert(property.to_string(), value.to_string());
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.nodes.get_mut(node.0) {
            element.text = text.to_string();
        }
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scrolls.push((top, behavior));
    }

    fn listen(&mut self, token: Token, target: ListenTarget, kind: EventKind) {
        self.listeners.insert(token, (target, kind));
    }

    fn unlisten(&mut self, token: Token) {
        self.listeners.remove(&token);
    }

    fn set_timeout(&mut self, token: Token, delay: Duration) {
        self.timer_seq += 1;
        self.timers.insert(token, (self.now + delay, self.timer_seq));
    }

    fn clear_timeout(&mut self, token: Token) {
        self.timers.remove(&token);
    }

    fn request_frame(&mut self, token: Token) {
        self.frames.insert(token);
    }

    fn cancel_frame(&mut self, token: Token) {
        self.frames.remove(&token);
    }

    fn observe(&mut self, token: Token, targets: &[NodeId], options: IntersectionOptions) {
        self.observers.insert(token, (targets.to_vec(), options));
    }

    fn disconnect(&mut self, token: Token) {
        self.observers.remove(&token);
    }

    fn render_icons(&mut self) {
        self.icons_rendered += 1;
    }
}
