//! Capabilities the controllers need from their surroundings.
//!
//! Controllers only ever see a [`Document`]: element lookup, attributes,
//! geometry and the current date. Writes go through [`Host`], which the page
//! drives by applying effects. The browser binding implements both traits
//! over `web-sys`; tests use an in-memory fake.

#[cfg(test)]
pub(crate) mod fake;

use chrono::NaiveDate;
use std::time::Duration;

/// Opaque handle to an element, issued by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Element queries the controllers issue. Results are in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Elements carrying the class.
    Class(String),
    /// Elements carrying any of the classes, each listed once.
    AnyClass(Vec<String>),
    /// Descendants of `root` carrying the class.
    ClassWithin { root: NodeId, class: String },
    /// `section` elements that have an `id` attribute.
    SectionsWithId,
    /// Anchors whose `href` starts with `#`.
    FragmentLinks,
}

impl Query {
    /// Equivalent CSS selector, for hosts backed by `querySelectorAll`.
    pub fn selector(&self) -> String {
        match self {
            Query::Class(class) | Query::ClassWithin { class, .. } => format!(".{class}"),
            Query::AnyClass(classes) => classes
                .iter()
                .map(|class| format!(".{class}"))
                .collect::<Vec<_>>()
                .join(", "),
            Query::SectionsWithId => "section[id]".to_string(),
            Query::FragmentLinks => "a[href^=\"#\"]".to_string(),
        }
    }
}

/// Snapshot of window scroll geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollMetrics {
    /// Total scrollable distance; non-positive when the page does not scroll.
    pub fn max_scroll(&self) -> f64 {
        self.document_height - self.viewport_height
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenTarget {
    Window,
    Document,
    Element(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scroll,
    Resize,
    Click,
    KeyDown,
}

impl EventKind {
    pub fn dom_name(self) -> &'static str {
        match self {
            EventKind::Scroll => "scroll",
            EventKind::Resize => "resize",
            EventKind::Click => "click",
            EventKind::KeyDown => "keydown",
        }
    }

    /// Scroll listeners never cancel the event, so hosts may register them
    /// as passive.
    pub fn is_passive(self) -> bool {
        matches!(self, EventKind::Scroll)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// Intersection observation parameters, relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionOptions {
    /// Visible fraction that must be crossed.
    pub threshold: f64,
    /// Amount the viewport is shrunk at the bottom, in CSS pixels.
    pub bottom_inset: f64,
}

impl IntersectionOptions {
    pub fn root_margin(&self) -> String {
        format!("0px 0px {}px 0px", -self.bottom_inset)
    }
}

/// Which part of the page a callback belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Owner {
    ProgressBar,
    NavBar,
    MobileMenu,
    SmoothScroll,
    ScrollReveal,
    DateStamp,
    /// Free-standing helpers such as debounce and throttle wrappers.
    Utility(u16),
}

/// Key for a listener, timer, animation frame or observer. The host hands it
/// back unchanged when the callback fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token {
    pub owner: Owner,
    pub slot: u32,
}

/// Read-only view of the page.
pub trait Document {
    fn element_by_id(&self, id: &str) -> Option<NodeId>;
    fn query_all(&self, query: &Query) -> Vec<NodeId>;
    fn body(&self) -> Option<NodeId>;
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn has_class(&self, node: NodeId, class: &str) -> bool;
    /// Distance from the top of the document, in CSS pixels.
    fn offset_top(&self, node: NodeId) -> f64;
    fn offset_height(&self, node: NodeId) -> f64;
    fn scroll_metrics(&self) -> ScrollMetrics;
    /// Local calendar date.
    fn today(&self) -> NaiveDate;
}

/// Side-effecting capabilities. Callbacks registered here come back to the
/// page as events carrying the same [`Token`].
pub trait Host: Document {
    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);
    fn set_text(&mut self, node: NodeId, text: &str);
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
    fn listen(&mut self, token: Token, target: ListenTarget, kind: EventKind);
    fn unlisten(&mut self, token: Token);
    fn set_timeout(&mut self, token: Token, delay: Duration);
    fn clear_timeout(&mut self, token: Token);
    fn request_frame(&mut self, token: Token);
    fn cancel_frame(&mut self, token: Token);
    fn observe(&mut self, token: Token, targets: &[NodeId], options: IntersectionOptions);
    fn disconnect(&mut self, token: Token);
    /// Hand icon placeholders to the external icon renderer.
    fn render_icons(&mut self);
}
