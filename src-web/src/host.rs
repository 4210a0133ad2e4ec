//! [`Host`] over the live DOM.
//!
//! Elements are interned into a registry so controllers can refer to them by
//! [`NodeId`]. Every callback handed to the browser is a `Closure` stored
//! under its [`Token`]; closures that have fired or been unregistered are
//! parked until the next dispatch, since dropping one while it runs aborts.

use crate::Runtime;
use crate::dispatch_with;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use pagewire::env::{
    Document, EventKind, Host, IntersectionOptions, ListenTarget, NodeId, Query, ScrollBehavior,
    ScrollMetrics, Token,
};
use pagewire::page::{DomEvent, IntersectionEntry, PageEvent};
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Weak;
use std::time::Duration;
use tracing::{debug, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, ScrollToOptions, Window,
};

type ListenerFn = Closure<dyn FnMut(Event)>;
type TimerFn = Closure<dyn FnMut()>;
type FrameFn = Closure<dyn FnMut(f64)>;
type ObserverFn = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Attach context to a failed browser call.
pub(crate) trait JsResultExt<T> {
    fn js_context(self, context: &'static str) -> Result<T>;
}

impl<T> JsResultExt<T> for std::result::Result<T, JsValue> {
    fn js_context(self, context: &'static str) -> Result<T> {
        self.map_err(|err| anyhow!("{err:?}")).context(context)
    }
}

fn report(result: Result<()>) {
    if let Err(err) = result {
        warn!("{err:#}");
    }
}

struct Listener {
    target: EventTarget,
    kind: EventKind,
    callback: ListenerFn,
}

pub(crate) struct BrowserHost {
    window: Window,
    document: web_sys::Document,
    runtime: Weak<RefCell<Runtime>>,
    nodes: RefCell<Vec<Element>>,
    listeners: HashMap<Token, Listener>,
    timers: HashMap<Token, (i32, TimerFn)>,
    frames: HashMap<Token, (i32, FrameFn)>,
    observers: HashMap<Token, (IntersectionObserver, ObserverFn)>,
    retired: Vec<Box<dyn Any>>,
}

impl BrowserHost {
    pub(crate) fn new(
        window: Window,
        document: web_sys::Document,
        runtime: Weak<RefCell<Runtime>>,
    ) -> Self {
        BrowserHost {
            window,
            document,
            runtime,
            nodes: RefCell::new(Vec::new()),
            listeners: HashMap::new(),
            timers: HashMap::new(),
            frames: HashMap::new(),
            observers: HashMap::new(),
            retired: Vec::new(),
        }
    }

    fn intern(&self, element: Element) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(index) = nodes.iter().position(|known| *known == element) {
            return NodeId(index);
        }
        nodes.push(element);
        NodeId(nodes.len() - 1)
    }

    fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(node.0).cloned()
    }

    fn html_element(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node)?.dyn_into::<HtmlElement>().ok()
    }

    /// Map an element reported by the browser back to its id, registering it
    /// if it has not been seen yet.
    pub(crate) fn node_for(&self, element: Element) -> NodeId {
        self.intern(element)
    }

    /// Drop callbacks parked by earlier dispatches.
    pub(crate) fn sweep(&mut self) {
        if !self.retired.is_empty() {
            trace!(count = self.retired.len(), "Dropping retired callbacks");
            self.retired.clear();
        }
    }

    /// A timer fires once; park its closure.
    pub(crate) fn timer_fired(&mut self, token: Token) {
        if let Some((_, callback)) = self.timers.remove(&token) {
            self.retired.push(Box::new(callback));
        }
    }

    pub(crate) fn frame_fired(&mut self, token: Token) {
        if let Some((_, callback)) = self.frames.remove(&token) {
            self.retired.push(Box::new(callback));
        }
    }

    fn event_target(&self, target: ListenTarget) -> Option<EventTarget> {
        match target {
            ListenTarget::Window => Some(self.window.clone().into()),
            ListenTarget::Document => Some(self.document.clone().into()),
            ListenTarget::Element(node) => self.element(node).map(Into::into),
        }
    }

    fn query_nodes(&self, query: &Query) -> Result<Vec<NodeId>> {
        let selector = query.selector();
        let list = match query {
            Query::ClassWithin { root, .. } => {
                let root = self
                    .element(*root)
                    .ok_or_else(|| anyhow!("Unknown query root {}", root.0))?;
                root.query_selector_all(&selector)
                    .js_context("querySelectorAll failed")?
            }
            _ => self
                .document
                .query_selector_all(&selector)
                .js_context("querySelectorAll failed")?,
        };
        let nodes = (0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.intern(element))
            .collect();
        Ok(nodes)
    }

    fn try_listen(&mut self, token: Token, target: ListenTarget, kind: EventKind) -> Result<()> {
        let event_target = self
            .event_target(target)
            .ok_or_else(|| anyhow!("Unknown listener target {target:?}"))?;
        let runtime = self.runtime.clone();
        let callback = ListenerFn::new(move |event: Event| {
            let dom = match kind {
                EventKind::Scroll => DomEvent::Scroll,
                EventKind::Resize => DomEvent::Resize,
                EventKind::Click => DomEvent::Click,
                EventKind::KeyDown => DomEvent::KeyDown {
                    key: event
                        .dyn_ref::<KeyboardEvent>()
                        .map(KeyboardEvent::key)
                        .unwrap_or_default(),
                },
            };
            let outcome = dispatch_with(&runtime, |_| PageEvent::Dom { token, event: dom });
            if outcome.default_prevented {
                event.prevent_default();
            }
        });

        let options = AddEventListenerOptions::new();
        options.set_passive(kind.is_passive());
        event_target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind.dom_name(),
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .js_context("addEventListener failed")?;
        self.listeners.insert(
            token,
            Listener {
                target: event_target,
                kind,
                callback,
            },
        );
        Ok(())
    }

    fn try_set_timeout(&mut self, token: Token, delay: Duration) -> Result<()> {
        let runtime = self.runtime.clone();
        let callback = TimerFn::new(move || {
            dispatch_with(&runtime, |_| PageEvent::Timer(token));
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis,
            )
            .js_context("setTimeout failed")?;
        self.timers.insert(token, (handle, callback));
        Ok(())
    }

    fn try_request_frame(&mut self, token: Token) -> Result<()> {
        let runtime = self.runtime.clone();
        let callback = FrameFn::new(move |_timestamp: f64| {
            dispatch_with(&runtime, |_| PageEvent::Frame(token));
        });
        let handle = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .js_context("requestAnimationFrame failed")?;
        self.frames.insert(token, (handle, callback));
        Ok(())
    }

    fn try_observe(
        &mut self,
        token: Token,
        targets: &[NodeId],
        options: IntersectionOptions,
    ) -> Result<()> {
        let runtime = self.runtime.clone();
        let callback = ObserverFn::new(move |entries: js_sys::Array, _: IntersectionObserver| {
            dispatch_with(&runtime, |host| {
                let entries = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| IntersectionEntry {
                        target: host.node_for(entry.target()),
                        is_intersecting: entry.is_intersecting(),
                        ratio: entry.intersection_ratio(),
                    })
                    .collect();
                PageEvent::Intersections { token, entries }
            });
        });

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin());
        init.set_threshold(&JsValue::from_f64(options.threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .js_context("IntersectionObserver construction failed")?;
        for &target in targets {
            match self.element(target) {
                Some(element) => observer.observe(&element),
                None => debug!(node = target.0, "Skipping unknown observe target"),
            }
        }
        self.observers.insert(token, (observer, callback));
        Ok(())
    }

    fn try_render_icons(&self) -> Result<()> {
        let lucide = js_sys::Reflect::get(&self.window, &JsValue::from_str("lucide"))
            .js_context("Reading window.lucide failed")?;
        if lucide.is_undefined() || lucide.is_null() {
            debug!("Icon library not loaded; skipping icon rendering");
            return Ok(());
        }
        let create = js_sys::Reflect::get(&lucide, &JsValue::from_str("createIcons"))
            .js_context("Reading lucide.createIcons failed")?;
        let Some(create) = create.dyn_ref::<js_sys::Function>() else {
            debug!("lucide.createIcons is not a function; skipping icon rendering");
            return Ok(());
        };
        create
            .call0(&lucide)
            .js_context("lucide.createIcons failed")?;
        Ok(())
    }
}

impl Document for BrowserHost {
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document
            .get_element_by_id(id)
            .map(|element| self.intern(element))
    }

    fn query_all(&self, query: &Query) -> Vec<NodeId> {
        self.query_nodes(query).unwrap_or_else(|err| {
            warn!(selector = %query.selector(), "{err:#}");
            Vec::new()
        })
    }

    fn body(&self) -> Option<NodeId> {
        self.document
            .body()
            .map(|body| self.intern(Element::from(body)))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.class_list().contains(class))
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        self.html_element(node)
            .map_or(0.0, |element| f64::from(element.offset_top()))
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.html_element(node)
            .map_or(0.0, |element| f64::from(element.offset_height()))
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        let dimension = |value: std::result::Result<JsValue, JsValue>| {
            value.ok().and_then(|value| value.as_f64()).unwrap_or(0.0)
        };
        ScrollMetrics {
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
            viewport_width: dimension(self.window.inner_width()),
            viewport_height: dimension(self.window.inner_height()),
            document_height: self
                .document
                .document_element()
                .map_or(0.0, |root| f64::from(root.scroll_height())),
        }
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

impl Host for BrowserHost {
    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            report(element.class_list().add_1(class).js_context("classList.add failed"));
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            report(
                element
                    .class_list()
                    .remove_1(class)
                    .js_context("classList.remove failed"),
            );
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.html_element(node) {
            report(
                element
                    .style()
                    .set_property(property, value)
                    .js_context("style.setProperty failed"),
            );
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.element(node) {
            element.set_text_content(Some(text));
        }
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn listen(&mut self, token: Token, target: ListenTarget, kind: EventKind) {
        report(self.try_listen(token, target, kind));
    }

    fn unlisten(&mut self, token: Token) {
        let Some(listener) = self.listeners.remove(&token) else {
            return;
        };
        report(
            listener
                .target
                .remove_event_listener_with_callback(
                    listener.kind.dom_name(),
                    listener.callback.as_ref().unchecked_ref(),
                )
                .js_context("removeEventListener failed"),
        );
        self.retired.push(Box::new(listener.callback));
    }

    fn set_timeout(&mut self, token: Token, delay: Duration) {
        report(self.try_set_timeout(token, delay));
    }

    fn clear_timeout(&mut self, token: Token) {
        if let Some((handle, callback)) = self.timers.remove(&token) {
            self.window.clear_timeout_with_handle(handle);
            self.retired.push(Box::new(callback));
        }
    }

    fn request_frame(&mut self, token: Token) {
        report(self.try_request_frame(token));
    }

    fn cancel_frame(&mut self, token: Token) {
        if let Some((handle, callback)) = self.frames.remove(&token) {
            report(
                self.window
                    .cancel_animation_frame(handle)
                    .js_context("cancelAnimationFrame failed"),
            );
            self.retired.push(Box::new(callback));
        }
    }

    fn observe(&mut self, token: Token, targets: &[NodeId], options: IntersectionOptions) {
        report(self.try_observe(token, targets, options));
    }

    fn disconnect(&mut self, token: Token) {
        if let Some((observer, callback)) = self.observers.remove(&token) {
            observer.disconnect();
            self.retired.push(Box::new(callback));
        }
    }

    fn render_icons(&mut self) {
        report(self.try_render_icons());
    }
}
