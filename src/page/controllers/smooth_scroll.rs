use super::Controller;
use crate::config::PageConfig;
use crate::env::{
    Document, EventKind, ListenTarget, NodeId, Owner, Query, ScrollBehavior, Token,
};
use crate::page::effects::{Bindings, Effect};
use crate::page::messages::{DomEvent, PageEvent};
use std::collections::BTreeMap;
use tracing::debug;

/// Animated scrolling for in-page anchors, offset by the sticky navbar.
pub struct SmoothScroll {
    navbar_id: String,
    default_navbar_height: f64,
    links: BTreeMap<Token, NodeId>,
    bindings: Bindings,
}

impl SmoothScroll {
    pub fn new(config: &PageConfig) -> Self {
        SmoothScroll {
            navbar_id: config.navbar_id.clone(),
            default_navbar_height: config.default_navbar_height,
            links: BTreeMap::new(),
            bindings: Bindings::new(Owner::SmoothScroll),
        }
    }

    /// Scroll offset that parks `target` just below the navbar, or `None` when
    /// the link should keep its default behavior.
    pub fn scroll_target(&self, doc: &dyn Document, link: NodeId) -> Option<f64> {
        let href = doc.attribute(link, "href")?;
        let fragment = href.strip_prefix('#')?;
        if fragment.is_empty() {
            return None;
        }
        let Some(target) = doc.element_by_id(fragment) else {
            debug!(%href, "Anchor target not found; leaving default navigation");
            return None;
        };
        let navbar_height = doc
            .element_by_id(&self.navbar_id)
            .map(|navbar| doc.offset_height(navbar))
            .filter(|height| *height > 0.0)
            .unwrap_or(self.default_navbar_height);
        Some(doc.offset_top(target) - navbar_height)
    }
}

impl Controller for SmoothScroll {
    fn owner(&self) -> Owner {
        Owner::SmoothScroll
    }

    fn init(&mut self, doc: &dyn Document, effects: &mut Vec<Effect>) {
        for link in doc.query_all(&Query::FragmentLinks) {
            let token = self
                .bindings
                .listen(ListenTarget::Element(link), EventKind::Click, effects);
            self.links.insert(token, link);
        }
        debug!(links = self.links.len(), "Smooth scroll wired");
    }

    fn handle(&mut self, doc: &dyn Document, event: &PageEvent, effects: &mut Vec<Effect>) {
        let PageEvent::Dom {
            token,
            event: DomEvent::Click,
        } = event
        else {
            return;
        };
        let Some(&link) = self.links.get(token) else {
            return;
        };
        if let Some(top) = self.scroll_target(doc, link) {
            effects.push(Effect::PreventDefault);
            effects.push(Effect::ScrollTo {
                top,
                behavior: ScrollBehavior::Smooth,
            });
        }
    }

    fn teardown(&mut self, effects: &mut Vec<Effect>) {
        self.bindings.release(effects);
        self.links.clear();
    }
}
