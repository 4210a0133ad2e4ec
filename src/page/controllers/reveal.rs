use super::Controller;
use crate::config::PageConfig;
use crate::env::{Document, IntersectionOptions, NodeId, Owner, Query, Token};
use crate::page::effects::{Bindings, Effect};
use crate::page::messages::PageEvent;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// One-way reveal of elements as they scroll into view.
pub struct ScrollReveal {
    reveal_class: String,
    visible_class: String,
    options: IntersectionOptions,
    observer: Option<Token>,
    revealed: BTreeSet<NodeId>,
    bindings: Bindings,
}

impl ScrollReveal {
    pub fn new(config: &PageConfig) -> Self {
        ScrollReveal {
            reveal_class: config.reveal_class.clone(),
            visible_class: config.visible_class.clone(),
            options: IntersectionOptions {
                threshold: config.reveal_threshold,
                bottom_inset: config.reveal_bottom_inset,
            },
            observer: None,
            revealed: BTreeSet::new(),
            bindings: Bindings::new(Owner::ScrollReveal),
        }
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }
}

impl Controller for ScrollReveal {
    fn owner(&self) -> Owner {
        Owner::ScrollReveal
    }

    fn init(&mut self, doc: &dyn Document, effects: &mut Vec<Effect>) {
        let targets = doc.query_all(&Query::Class(self.reveal_class.clone()));
        if targets.is_empty() {
            debug!(class = %self.reveal_class, "No reveal elements; observer not created");
            return;
        }
        debug!(targets = targets.len(), "Observing reveal elements");
        self.observer = Some(self.bindings.observe(targets, self.options, effects));
    }

    fn handle(&mut self, _doc: &dyn Document, event: &PageEvent, effects: &mut Vec<Effect>) {
        let PageEvent::Intersections { token, entries } = event else {
            return;
        };
        if self.observer != Some(*token) {
            return;
        }
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            if self.revealed.insert(entry.target) {
                trace!(node = entry.target.0, ratio = entry.ratio, "Revealing element");
                effects.push(Effect::AddClass {
                    node: entry.target,
                    class: self.visible_class.clone(),
                });
            }
        }
    }

    fn teardown(&mut self, effects: &mut Vec<Effect>) {
        self.bindings.release(effects);
        self.observer = None;
        self.revealed.clear();
    }
}
