//! The page runtime: owns the controllers, boots them in a fixed order and
//! routes host callbacks back to whichever controller registered them.

mod controllers;
pub(crate) mod effects;
mod messages;

pub use controllers::{
    Controller, DateStamp, MenuState, MobileMenu, NavBar, ProgressBar, ScrollReveal,
    SmoothScroll, format_long_date, scroll_progress,
};
pub use effects::{Effect, apply_effect};
pub use messages::{DomEvent, IntersectionEntry, PageEvent};

use crate::config::PageConfig;
use crate::env::{Host, Owner};
use tracing::{debug, info, trace};

/// Outcome of routing one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// The browser's default action for the event must be suppressed.
    pub default_prevented: bool,
}

pub struct Page {
    config: PageConfig,
    controllers: Vec<Box<dyn Controller>>,
    booted: bool,
}

impl Page {
    pub fn new(config: PageConfig) -> Self {
        let controllers: Vec<Box<dyn Controller>> = vec![
            Box::new(ProgressBar::new(&config)),
            Box::new(NavBar::new(&config)),
            Box::new(MobileMenu::new(&config)),
            Box::new(SmoothScroll::new(&config)),
            Box::new(ScrollReveal::new(&config)),
            Box::new(DateStamp::new(&config)),
        ];
        Page {
            config,
            controllers,
            booted: false,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn is_booted(&self) -> bool {
        self.booted
    }

    /// Render icons, then initialize every controller. Missing elements only
    /// disable the controller that needed them. A second call is ignored.
    pub fn boot<H: Host>(&mut self, host: &mut H) {
        if self.booted {
            debug!("Page already booted; ignoring");
            return;
        }
        self.booted = true;
        apply_effect(host, Effect::RenderIcons);

        let mut effects = Vec::new();
        for controller in &mut self.controllers {
            controller.init(&*host, &mut effects);
            trace!(owner = ?controller.owner(), effects = effects.len(), "Controller initialized");
            for effect in effects.drain(..) {
                apply_effect(host, effect);
            }
        }
        info!("Page interactions ready");
    }

    /// Route a host callback to its owner and apply what it produced.
    pub fn dispatch<H: Host>(&mut self, host: &mut H, event: PageEvent) -> Dispatch {
        if !self.booted {
            debug!(?event, "Event before boot; ignoring");
            return Dispatch::default();
        }
        let owner = event.token().owner;
        let Some(controller) = self.controller_mut(owner) else {
            trace!(?owner, "No controller for event owner");
            return Dispatch::default();
        };

        let mut effects = Vec::new();
        controller.handle(&*host, &event, &mut effects);
        let mut dispatch = Dispatch::default();
        for effect in effects {
            dispatch.default_prevented |= apply_effect(host, effect);
        }
        dispatch
    }

    /// Release every listener, timer, frame and observer still registered.
    pub fn teardown<H: Host>(&mut self, host: &mut H) {
        if !self.booted {
            return;
        }
        let mut effects = Vec::new();
        for controller in &mut self.controllers {
            controller.teardown(&mut effects);
        }
        debug!(released = effects.len(), "Page torn down");
        for effect in effects {
            apply_effect(host, effect);
        }
        self.booted = false;
    }

    fn controller_mut(&mut self, owner: Owner) -> Option<&mut (dyn Controller + 'static)> {
        self.controllers
            .iter_mut()
            .find(|controller| controller.owner() == owner)
            .map(|controller| &mut **controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::fake::{FakeElement, FakeHost};
    use crate::env::{Document, EventKind, Host, ListenTarget, NodeId, Token};
    use chrono::NaiveDate;
    use std::time::Duration;

    struct Landing {
        host: FakeHost,
        progress: NodeId,
        navbar: NodeId,
        toggle: NodeId,
        menu: NodeId,
        body: NodeId,
        intro_link: NodeId,
        anchor: NodeId,
        dead_anchor: NodeId,
        reveal: NodeId,
        cover_date: NodeId,
        footer_date: NodeId,
    }

    fn landing() -> Landing {
        let mut host = FakeHost::new();
        let body = host.add_body();
        let progress = host.add(FakeElement::new("div").id("progressBar"));
        let navbar = host.add(FakeElement::new("nav").id("navbar").geometry(0.0, 80.0));
        let intro_link = host.add(
            FakeElement::new("a")
                .class("nav-link")
                .attr("href", "#intro")
                .child_of(navbar),
        );
        let anchor = host.add(
            FakeElement::new("a")
                .class("nav-link")
                .attr("href", "#pricing")
                .child_of(navbar),
        );
        let toggle = host.add(FakeElement::new("button").id("navToggle"));
        let menu = host.add(FakeElement::new("div").id("mobileMenu"));
        host.add(
            FakeElement::new("a")
                .class("mobile-link")
                .attr("href", "#intro")
                .child_of(menu),
        );
        let dead_anchor = host.add(FakeElement::new("a").attr("href", "#nowhere"));
        host.add(FakeElement::new("section").id("intro").geometry(0.0, 900.0));
        let reveal = host.add(
            FakeElement::new("section")
                .id("pricing")
                .class("reveal")
                .geometry(900.0, 900.0),
        );
        let cover_date = host.add(FakeElement::new("span").id("coverDate"));
        let footer_date = host.add(FakeElement::new("span").id("footerDate"));
        host.metrics.document_height = 2800.0;
        host.metrics.viewport_height = 800.0;
        host.today = NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date");

        Landing {
            host,
            progress,
            navbar,
            toggle,
            menu,
            body,
            intro_link,
            anchor,
            dead_anchor,
            reveal,
            cover_date,
            footer_date,
        }
    }

    fn booted() -> (Page, Landing) {
        let mut page = Page::new(PageConfig::default());
        let mut landing = landing();
        page.boot(&mut landing.host);
        (page, landing)
    }

    fn fire(page: &mut Page, host: &mut FakeHost, target: ListenTarget, kind: EventKind) -> bool {
        let event = match kind {
            EventKind::Scroll => DomEvent::Scroll,
            EventKind::Resize => DomEvent::Resize,
            EventKind::Click => DomEvent::Click,
            EventKind::KeyDown => DomEvent::KeyDown {
                key: "Escape".to_string(),
            },
        };
        let mut prevented = false;
        for token in host.listeners_for(target, kind) {
            let outcome = page.dispatch(
                &mut *host,
                PageEvent::Dom {
                    token,
                    event: event.clone(),
                },
            );
            prevented |= outcome.default_prevented;
        }
        prevented
    }

    #[test]
    fn boot_renders_icons_and_stamps_dates() {
        let (page, landing) = booted();
        assert!(page.is_booted());
        assert_eq!(landing.host.icons_rendered, 1);
        assert_eq!(landing.host.text(landing.cover_date), "October 19, 2026");
        assert_eq!(landing.host.text(landing.footer_date), "October 19, 2026");
        assert_eq!(landing.host.style(landing.progress, "width").as_deref(), Some("0%"));
        assert_eq!(landing.host.observer_count(), 1);
    }

    #[test]
    fn second_boot_is_ignored() {
        let (mut page, mut landing) = booted();
        let listeners = landing.host.listener_count();
        page.boot(&mut landing.host);
        assert_eq!(landing.host.icons_rendered, 1);
        assert_eq!(landing.host.listener_count(), listeners);
    }

    #[test]
    fn scroll_updates_progress_and_navbar() {
        let (mut page, mut landing) = booted();
        landing.host.metrics.scroll_y = 1000.0;
        fire(
            &mut page,
            &mut landing.host,
            ListenTarget::Window,
            EventKind::Scroll,
        );
        assert_eq!(
            landing.host.style(landing.progress, "width").as_deref(),
            Some("50%")
        );
        assert!(landing.host.has_class(landing.anchor, "active"));
        assert!(!landing.host.has_class(landing.navbar, "scrolled"));

        for token in landing.host.take_frames() {
            page.dispatch(&mut landing.host, PageEvent::Frame(token));
        }
        assert!(landing.host.has_class(landing.navbar, "scrolled"));
    }

    #[test]
    fn anchor_clicks_prevent_default_only_when_target_exists() {
        let (mut page, mut landing) = booted();
        let anchor = ListenTarget::Element(landing.anchor);
        assert!(fire(&mut page, &mut landing.host, anchor, EventKind::Click));
        assert_eq!(landing.host.scrolls.len(), 1);

        let dead = ListenTarget::Element(landing.dead_anchor);
        assert!(!fire(&mut page, &mut landing.host, dead, EventKind::Click));
        assert_eq!(landing.host.scrolls.len(), 1);
    }

    #[test]
    fn menu_opens_and_escape_closes() {
        let (mut page, mut landing) = booted();
        let toggle = ListenTarget::Element(landing.toggle);
        fire(&mut page, &mut landing.host, toggle, EventKind::Click);
        assert!(landing.host.has_class(landing.menu, "active"));
        assert!(landing.host.has_class(landing.body, "menu-open"));

        for token in landing.host.advance(Duration::from_millis(100)) {
            page.dispatch(&mut landing.host, PageEvent::Timer(token));
        }
        fire(
            &mut page,
            &mut landing.host,
            ListenTarget::Document,
            EventKind::KeyDown,
        );
        assert!(!landing.host.has_class(landing.menu, "active"));
        assert!(!landing.host.has_class(landing.toggle, "active"));
        assert!(!landing.host.has_class(landing.body, "menu-open"));
    }

    #[test]
    fn reveal_marks_intersecting_section() {
        let (mut page, mut landing) = booted();
        // The observer is the first registration the reveal controller makes.
        let token = Token {
            owner: Owner::ScrollReveal,
            slot: 0,
        };
        assert_eq!(landing.host.observer_targets(token), vec![landing.reveal]);

        page.dispatch(
            &mut landing.host,
            PageEvent::Intersections {
                token,
                entries: vec![IntersectionEntry {
                    target: landing.reveal,
                    is_intersecting: true,
                    ratio: 0.2,
                }],
            },
        );
        assert!(landing.host.has_class(landing.reveal, "visible"));
    }

    #[test]
    fn missing_markup_degrades_silently() {
        let mut host = FakeHost::new();
        let mut page = Page::new(PageConfig::default());
        page.boot(&mut host);
        assert!(page.is_booted());
        assert_eq!(host.icons_rendered, 1);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.observer_count(), 0);
    }

    #[test]
    fn teardown_releases_every_registration() {
        let (mut page, mut landing) = booted();
        landing.host.metrics.scroll_y = 400.0;
        fire(
            &mut page,
            &mut landing.host,
            ListenTarget::Window,
            EventKind::Scroll,
        );
        let toggle = ListenTarget::Element(landing.toggle);
        fire(&mut page, &mut landing.host, toggle, EventKind::Click);
        assert!(landing.host.pending_frames() > 0);
        assert!(landing.host.pending_timers() > 0);

        page.teardown(&mut landing.host);
        assert!(!page.is_booted());
        assert_eq!(landing.host.listener_count(), 0);
        assert_eq!(landing.host.pending_timers(), 0);
        assert_eq!(landing.host.pending_frames(), 0);
        assert_eq!(landing.host.observer_count(), 0);
    }

    #[test]
    fn reboot_after_teardown_starts_from_fresh_state() {
        let (mut page, mut landing) = booted();
        assert!(landing.host.has_class(landing.intro_link, "active"));
        landing.host.metrics.scroll_y = 1000.0;
        fire(
            &mut page,
            &mut landing.host,
            ListenTarget::Window,
            EventKind::Scroll,
        );
        let toggle = ListenTarget::Element(landing.toggle);
        fire(&mut page, &mut landing.host, toggle, EventKind::Click);
        let observer = Token {
            owner: Owner::ScrollReveal,
            slot: 0,
        };
        let revealed = vec![IntersectionEntry {
            target: landing.reveal,
            is_intersecting: true,
            ratio: 0.5,
        }];
        page.dispatch(
            &mut landing.host,
            PageEvent::Intersections {
                token: observer,
                entries: revealed.clone(),
            },
        );
        assert!(landing.host.has_class(landing.anchor, "active"));
        assert!(landing.host.has_class(landing.menu, "active"));
        landing.host.metrics.scroll_y = 0.0;
        fire(
            &mut page,
            &mut landing.host,
            ListenTarget::Window,
            EventKind::Scroll,
        );
        assert!(landing.host.has_class(landing.intro_link, "active"));

        page.teardown(&mut landing.host);
        // A single-page app swaps in fresh markup before booting again.
        for node in [landing.intro_link, landing.menu, landing.toggle] {
            landing.host.remove_class(node, "active");
        }
        landing.host.remove_class(landing.body, "menu-open");
        landing.host.remove_class(landing.reveal, "visible");

        page.boot(&mut landing.host);
        assert!(page.is_booted());
        assert!(landing.host.has_class(landing.intro_link, "active"));
        assert!(!landing.host.has_class(landing.anchor, "active"));

        fire(&mut page, &mut landing.host, toggle, EventKind::Click);
        assert!(landing.host.has_class(landing.menu, "active"));
        assert!(landing.host.has_class(landing.toggle, "active"));
        assert!(landing.host.has_class(landing.body, "menu-open"));

        // Slots keep counting across a teardown.
        let observer = Token {
            owner: Owner::ScrollReveal,
            slot: 1,
        };
        assert_eq!(landing.host.observer_targets(observer), vec![landing.reveal]);
        page.dispatch(
            &mut landing.host,
            PageEvent::Intersections {
                token: observer,
                entries: revealed,
            },
        );
        assert!(landing.host.has_class(landing.reveal, "visible"));
    }

    #[test]
    fn events_before_boot_are_ignored() {
        let mut landing = landing();
        let mut page = Page::new(PageConfig::default());
        let outcome = page.dispatch(
            &mut landing.host,
            PageEvent::Dom {
                token: Token {
                    owner: Owner::SmoothScroll,
                    slot: 0,
                },
                event: DomEvent::Click,
            },
        );
        assert_eq!(outcome, Dispatch::default());
        assert!(landing.host.scrolls.is_empty());
    }
}
