use super::Controller;
use crate::config::PageConfig;
use crate::env::{Document, EventKind, ListenTarget, NodeId, Owner, Query, Token};
use crate::page::effects::{Bindings, Effect};
use crate::page::messages::{DomEvent, PageEvent};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy)]
struct MenuParts {
    toggle: NodeId,
    menu: NodeId,
    body: Option<NodeId>,
}

#[derive(Debug, Default)]
struct MenuListeners {
    toggle: Option<Token>,
    close: Option<Token>,
    links: Vec<Token>,
    keydown: Option<Token>,
    resize: Option<Token>,
}

/// Slide-out menu for narrow viewports.
///
/// The open flag is held here and mirrored onto three markers (menu, toggle,
/// body) that are always written together. Only the toggle flips the state;
/// every other trigger closes.
pub struct MobileMenu {
    toggle_id: String,
    menu_id: String,
    close_id: String,
    link_class: String,
    cta_class: String,
    active_class: String,
    body_class: String,
    desktop_breakpoint: f64,
    stagger_base: Duration,
    stagger_step: Duration,
    slide_px: f64,
    transition: String,
    parts: Option<MenuParts>,
    state: MenuState,
    listeners: MenuListeners,
    staggered: BTreeMap<Token, NodeId>,
    bindings: Bindings,
}

impl MobileMenu {
    pub fn new(config: &PageConfig) -> Self {
        MobileMenu {
            toggle_id: config.nav_toggle_id.clone(),
            menu_id: config.mobile_menu_id.clone(),
            close_id: config.mobile_close_id.clone(),
            link_class: config.mobile_link_class.clone(),
            cta_class: config.mobile_cta_class.clone(),
            active_class: config.active_class.clone(),
            body_class: config.menu_open_class.clone(),
            desktop_breakpoint: config.desktop_breakpoint,
            stagger_base: Duration::from_millis(config.stagger_base_ms),
            stagger_step: Duration::from_millis(config.stagger_step_ms),
            slide_px: config.link_slide_px,
            transition: config.link_transition.clone(),
            parts: None,
            state: MenuState::Closed,
            listeners: MenuListeners::default(),
            staggered: BTreeMap::new(),
            bindings: Bindings::new(Owner::MobileMenu),
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    fn toggle(&mut self, doc: &dyn Document, effects: &mut Vec<Effect>) {
        match self.state {
            MenuState::Closed => self.open(doc, effects),
            MenuState::Open => self.close(effects, "toggle"),
        }
    }

    fn open(&mut self, doc: &dyn Document, effects: &mut Vec<Effect>) {
        let Some(parts) = self.parts else {
            return;
        };
        self.state = MenuState::Open;
        self.write_markers(parts, true, effects);

        let links = doc.query_all(&Query::ClassWithin {
            root: parts.menu,
            class: self.link_class.clone(),
        });
        for (index, link) in links.into_iter().enumerate() {
            effects.push(Effect::SetStyle {
                node: link,
                property: "opacity",
                value: "0".to_string(),
            });
            effects.push(Effect::SetStyle {
                node: link,
                property: "transform",
                value: format!("translateX(-{}px)", self.slide_px),
            });
            let delay = self.stagger_base + self.stagger_step * index as u32;
            let token = self.bindings.set_timeout(delay, effects);
            self.staggered.insert(token, link);
        }
        info!("Mobile menu opened");
    }

    fn close(&mut self, effects: &mut Vec<Effect>, trigger: &'static str) {
        if self.state == MenuState::Closed {
            return;
        }
        let Some(parts) = self.parts else {
            return;
        };
        self.state = MenuState::Closed;
        self.write_markers(parts, false, effects);
        info!(trigger, "Mobile menu closed");
    }

    fn write_markers(&self, parts: MenuParts, open: bool, effects: &mut Vec<Effect>) {
        let marked = [
            (Some(parts.menu), &self.active_class),
            (Some(parts.toggle), &self.active_class),
            (parts.body, &self.body_class),
        ];
        for (node, class) in marked {
            let Some(node) = node else {
                continue;
            };
            let class = class.clone();
            effects.push(if open {
                Effect::AddClass { node, class }
            } else {
                Effect::RemoveClass { node, class }
            });
        }
    }

    fn slide_in(&mut self, token: Token, effects: &mut Vec<Effect>) {
        self.bindings.timer_fired(token);
        let Some(link) = self.staggered.remove(&token) else {
            return;
        };
        effects.push(Effect::SetStyle {
            node: link,
            property: "transition",
            value: self.transition.clone(),
        });
        effects.push(Effect::SetStyle {
            node: link,
            property: "opacity",
            value: "1".to_string(),
        });
        effects.push(Effect::SetStyle {
            node: link,
            property: "transform",
            value: "translateX(0)".to_string(),
        });
    }
}

impl Controller for MobileMenu {
    fn owner(&self) -> Owner {
        Owner::MobileMenu
    }

    fn init(&mut self, doc: &dyn Document, effects: &mut Vec<Effect>) {
        let (Some(toggle), Some(menu)) = (
            doc.element_by_id(&self.toggle_id),
            doc.element_by_id(&self.menu_id),
        ) else {
            debug!(
                toggle = %self.toggle_id,
                menu = %self.menu_id,
                "Mobile menu elements missing; menu inactive"
            );
            return;
        };
        let parts = MenuParts {
            toggle,
            menu,
            body: doc.body(),
        };
        self.parts = Some(parts);
        self.state = if doc.has_class(menu, &self.active_class) {
            MenuState::Open
        } else {
            MenuState::Closed
        };

        self.listeners.toggle = Some(self.bindings.listen(
            ListenTarget::Element(toggle),
            EventKind::Click,
            effects,
        ));
        if let Some(close) = doc.element_by_id(&self.close_id) {
            self.listeners.close = Some(self.bindings.listen(
                ListenTarget::Element(close),
                EventKind::Click,
                effects,
            ));
        }
        let closers = doc.query_all(&Query::AnyClass(vec![
            self.link_class.clone(),
            self.cta_class.clone(),
        ]));
        for link in closers {
            let token = self
                .bindings
                .listen(ListenTarget::Element(link), EventKind::Click, effects);
            self.listeners.links.push(token);
        }
        self.listeners.keydown = Some(self.bindings.listen(
            ListenTarget::Document,
            EventKind::KeyDown,
            effects,
        ));
        self.listeners.resize = Some(self.bindings.listen(
            ListenTarget::Window,
            EventKind::Resize,
            effects,
        ));
        debug!(links = self.listeners.links.len(), "Mobile menu wired");
    }

    fn handle(&mut self, doc: &dyn Document, event: &PageEvent, effects: &mut Vec<Effect>) {
        match event {
            PageEvent::Dom {
                token,
                event: DomEvent::Click,
            } => {
                let token = Some(*token);
                if token == self.listeners.toggle {
                    self.toggle(doc, effects);
                } else if token == self.listeners.close {
                    self.close(effects, "close-control");
                } else if self.listeners.links.iter().any(|&link| Some(link) == token) {
                    self.close(effects, "link");
                }
            }
            PageEvent::Dom {
                token,
                event: DomEvent::KeyDown { key },
            } if self.listeners.keydown == Some(*token) => {
                if key == "Escape" {
                    self.close(effects, "escape");
                }
            }
            PageEvent::Dom {
                token,
                event: DomEvent::Resize,
            } if self.listeners.resize == Some(*token) => {
                if doc.scroll_metrics().viewport_width >= self.desktop_breakpoint {
                    self.close(effects, "resize");
                }
            }
            PageEvent::Timer(token) => self.slide_in(*token, effects),
            _ => {}
        }
    }

    fn teardown(&mut self, effects: &mut Vec<Effect>) {
        self.bindings.release(effects);
        self.staggered.clear();
        self.listeners = MenuListeners::default();
        self.parts = None;
        self.state = MenuState::Closed;
    }
}
