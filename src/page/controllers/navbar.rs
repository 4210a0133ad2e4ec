use super::Controller;
use crate::config::{PageConfig, UnmatchedSectionPolicy};
use crate::env::{Document, EventKind, ListenTarget, NodeId, Owner, Query, Token};
use crate::page::effects::{Bindings, Effect};
use crate::page::messages::{DomEvent, PageEvent};
use tracing::{debug, trace};

/// Which navigation link currently carries the active marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Highlight {
    /// Nothing written yet; whatever the markup ships with stands.
    Markup,
    Active(NodeId),
    Cleared,
}

#[derive(Debug, Clone)]
struct Section {
    node: NodeId,
    id: String,
}

/// Sticky navigation bar: the `scrolled` marker (coalesced to one update per
/// animation frame) and active-section highlighting (on every scroll).
pub struct NavBar {
    navbar_id: String,
    nav_link_class: String,
    scrolled_class: String,
    active_class: String,
    scrolled_threshold: f64,
    probe_offset: f64,
    unmatched: UnmatchedSectionPolicy,
    navbar: Option<NodeId>,
    scroll: Option<Token>,
    pending_frame: Option<Token>,
    scrolled: bool,
    sections: Vec<Section>,
    links: Vec<NodeId>,
    highlight: Highlight,
    bindings: Bindings,
}

impl NavBar {
    pub fn new(config: &PageConfig) -> Self {
        NavBar {
            navbar_id: config.navbar_id.clone(),
            nav_link_class: config.nav_link_class.clone(),
            scrolled_class: config.scrolled_class.clone(),
            active_class: config.active_class.clone(),
            scrolled_threshold: config.scrolled_threshold,
            probe_offset: config.section_probe_offset,
            unmatched: config.unmatched_section_policy,
            navbar: None,
            scroll: None,
            pending_frame: None,
            scrolled: false,
            sections: Vec::new(),
            links: Vec::new(),
            highlight: Highlight::Markup,
            bindings: Bindings::new(Owner::NavBar),
        }
    }

    /// Whether a scrolled-state update is queued for the next frame.
    pub fn is_ticking(&self) -> bool {
        self.pending_frame.is_some()
    }

    fn handle_scroll(&mut self, doc: &dyn Document, effects: &mut Vec<Effect>) {
        if self.pending_frame.is_none() {
            self.pending_frame = Some(self.bindings.request_frame(effects));
        }
        self.highlight_active_section(doc, effects);
    }

    fn handle_frame(&mut self, doc: &dyn Document, token: Token, effects: &mut Vec<Effect>) {
        if !self.bindings.frame_fired(token) || self.pending_frame != Some(token) {
            return;
        }
        self.pending_frame = None;

        let Some(navbar) = self.navbar else {
            return;
        };
        let scrolled = doc.scroll_metrics().scroll_y > self.scrolled_threshold;
        if scrolled == self.scrolled {
            return;
        }
        self.scrolled = scrolled;
        let class = self.scrolled_class.clone();
        if scrolled {
            effects.push(Effect::AddClass {
                node: navbar,
                class,
            });
        } else {
            effects.push(Effect::RemoveClass {
                node: navbar,
                class,
            });
        }
        trace!(scrolled, "Navbar scrolled state changed");
    }

    fn highlight_active_section(&mut self, doc: &dyn Document, effects: &mut Vec<Effect>) {
        let probe = doc.scroll_metrics().scroll_y + self.probe_offset;
        // Later sections win when extents overlap.
        let matched = self
            .sections
            .iter()
            .filter(|section| {
                let top = doc.offset_top(section.node);
                probe >= top && probe < top + doc.offset_height(section.node)
            })
            .last();

        match matched {
            Some(section) => {
                let fragment = format!("#{}", section.id);
                let link = self
                    .links
                    .iter()
                    .copied()
                    .find(|&link| doc.attribute(link, "href").as_deref() == Some(fragment.as_str()));
                self.mark_active(link, effects);
            }
            None if self.unmatched == UnmatchedSectionPolicy::Clear => {
                self.mark_active(None, effects);
            }
            None => {}
        }
    }

    fn mark_active(&mut self, link: Option<NodeId>, effects: &mut Vec<Effect>) {
        let next = link.map_or(Highlight::Cleared, Highlight::Active);
        if next == self.highlight {
            return;
        }
        self.highlight = next;

        for &other in self.links.iter().filter(|&&other| Some(other) != link) {
            effects.push(Effect::RemoveClass {
                node: other,
                class: self.active_class.clone(),
            });
        }
        if let Some(link) = link {
            effects.push(Effect::AddClass {
                node: link,
                class: self.active_class.clone(),
            });
        }
    }
}

impl Controller for NavBar {
    fn owner(&self) -> Owner {
        Owner::NavBar
    }

    fn init(&mut self, doc: &dyn Document, effects: &mut Vec<Effect>) {
        let Some(navbar) = doc.element_by_id(&self.navbar_id) else {
            debug!(id = %self.navbar_id, "Navbar element missing; navigation inactive");
            return;
        };
        self.navbar = Some(navbar);
        self.scrolled = doc.has_class(navbar, &self.scrolled_class);
        self.sections = doc
            .query_all(&Query::SectionsWithId)
            .into_iter()
            .filter_map(|node| {
                let id = doc.attribute(node, "id")?;
                Some(Section { node, id })
            })
            .collect();
        self.links = doc.query_all(&Query::Class(self.nav_link_class.clone()));
        debug!(
            sections = self.sections.len(),
            links = self.links.len(),
            "Navigation wired"
        );

        self.scroll = Some(
            self.bindings
                .listen(ListenTarget::Window, EventKind::Scroll, effects),
        );
        self.highlight_active_section(doc, effects);
    }

    fn handle(&mut self, doc: &dyn Document, event: &PageEvent, effects: &mut Vec<Effect>) {
        match event {
            PageEvent::Dom {
                token,
                event: DomEvent::Scroll,
            } if self.scroll == Some(*token) => self.handle_scroll(doc, effects),
            PageEvent::Frame(token) => self.handle_frame(doc, *token, effects),
            _ => {}
        }
    }

    fn teardown(&mut self, effects: &mut Vec<Effect>) {
        self.bindings.release(effects);
        self.navbar = None;
        self.scroll = None;
        self.pending_frame = None;
        self.scrolled = false;
        self.sections.clear();
        self.links.clear();
        self.highlight = Highlight::Markup;
    }
}
