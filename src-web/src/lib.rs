//! Browser binding for `pagewire`.
//!
//! Exposes `start`, `start_with_config`, `default_config` and `teardown` to
//! JavaScript. The running page and its host live in a thread-local
//! `Rc<RefCell<_>>`; every browser callback holds a `Weak` to it and drops its
//! event if the runtime is gone or already borrowed.

mod console;
mod host;

use crate::host::{BrowserHost, JsResultExt};
use anyhow::{Context, Result};
use pagewire::config::{load_config, serialize_config};
use pagewire::{Dispatch, Page, PageConfig, PageEvent};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::PageTransitionEvent;

static PANIC_HOOK_SET: OnceLock<()> = OnceLock::new();

pub(crate) struct Runtime {
    page: Page,
    host: BrowserHost,
}

thread_local! {
    static RUNTIME: RefCell<Option<Rc<RefCell<Runtime>>>> = const { RefCell::new(None) };
    static PENDING_BOOT: RefCell<Option<Closure<dyn FnMut()>>> = const { RefCell::new(None) };
    static PAGEHIDE: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
}

fn init_panic_hook() {
    PANIC_HOOK_SET.get_or_init(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = info.to_string();
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

/// Build the event with access to the host, then route it through the page.
pub(crate) fn dispatch_with(
    runtime: &Weak<RefCell<Runtime>>,
    build: impl FnOnce(&BrowserHost) -> PageEvent,
) -> Dispatch {
    let Some(runtime) = runtime.upgrade() else {
        return Dispatch::default();
    };
    let Ok(mut runtime) = runtime.try_borrow_mut() else {
        warn!("Page runtime busy; dropping re-entrant event");
        return Dispatch::default();
    };
    let Runtime { page, host } = &mut *runtime;
    host.sweep();
    let event = build(host);
    match event {
        PageEvent::Timer(token) => host.timer_fired(token),
        PageEvent::Frame(token) => host.frame_fired(token),
        _ => {}
    }
    page.dispatch(host, event)
}

/// Boot with the default configuration once the document has been parsed.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    start_when_ready(None)
}

/// Boot with a TOML configuration. Text that fails to parse is reported and
/// replaced by the defaults.
#[wasm_bindgen]
pub fn start_with_config(config: &str) -> Result<(), JsValue> {
    start_when_ready(Some(config.to_string()))
}

/// The default configuration in its TOML form, as a starting point for
/// `start_with_config`.
#[wasm_bindgen]
pub fn default_config() -> Result<String, JsValue> {
    serialize_config(&PageConfig::default()).map_err(|err| JsValue::from_str(&format!("{err:#}")))
}

/// Release every listener, timer, frame and observer held by the page.
#[wasm_bindgen]
pub fn teardown() {
    cancel_pending_boot();
    let Some(runtime) = RUNTIME.with(|slot| slot.borrow_mut().take()) else {
        debug!("Teardown requested with no running page");
        return;
    };
    match runtime.try_borrow_mut() {
        Ok(mut runtime) => {
            let Runtime { page, host } = &mut *runtime;
            page.teardown(host);
            info!("Page runtime stopped");
        }
        Err(_) => warn!("Page runtime busy during teardown; callbacks stay registered"),
    };
}

fn start_when_ready(config: Option<String>) -> Result<(), JsValue> {
    init_panic_hook();
    console::init_tracing();
    if RUNTIME.with(|slot| slot.borrow().is_some()) {
        debug!("Page already started; ignoring");
        return Ok(());
    }
    if PENDING_BOOT.with(|pending| pending.borrow().is_some()) {
        debug!("Start already waiting for DOMContentLoaded; ignoring");
        return Ok(());
    }

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    if document.ready_state() != "loading" {
        return boot(config.as_deref()).map_err(|err| JsValue::from_str(&format!("{err:#}")));
    }

    let callback = Closure::<dyn FnMut()>::new(move || {
        if let Err(err) = boot(config.as_deref()) {
            warn!("{err:#}");
        }
    });
    document
        .add_event_listener_with_callback("DOMContentLoaded", callback.as_ref().unchecked_ref())?;
    PENDING_BOOT.with(|pending| *pending.borrow_mut() = Some(callback));
    debug!("Waiting for DOMContentLoaded");
    Ok(())
}

fn cancel_pending_boot() {
    let Some(callback) = PENDING_BOOT.with(|pending| pending.borrow_mut().take()) else {
        return;
    };
    let removed = web_sys::window()
        .and_then(|window| window.document())
        .map(|document| {
            document.remove_event_listener_with_callback(
                "DOMContentLoaded",
                callback.as_ref().unchecked_ref(),
            )
        });
    match removed {
        Some(Ok(())) => debug!("Pending boot cancelled"),
        Some(Err(err)) => {
            warn!("Removing DOMContentLoaded listener failed: {err:?}");
            // Still registered, so it has to outlive this scope.
            callback.forget();
        }
        None => callback.forget(),
    }
}

fn boot(config_text: Option<&str>) -> Result<()> {
    if RUNTIME.with(|slot| slot.borrow().is_some()) {
        return Ok(());
    }
    let config = load_config(config_text);
    console::set_log_level(config.log_level);

    let window = web_sys::window().context("No global window")?;
    let document = window.document().context("Window has no document")?;
    let runtime = Rc::new_cyclic(|weak: &Weak<RefCell<Runtime>>| {
        RefCell::new(Runtime {
            page: Page::new(config),
            host: BrowserHost::new(window.clone(), document, weak.clone()),
        })
    });
    {
        let mut state = runtime
            .try_borrow_mut()
            .map_err(|_| anyhow::anyhow!("Page runtime already borrowed"))?;
        let Runtime { page, host } = &mut *state;
        page.boot(host);
    }
    RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime));
    install_pagehide(&window)?;
    info!("Page runtime started");
    Ok(())
}

/// Tear down when the page is discarded. A page entering the back/forward
/// cache keeps its runtime so it resumes intact when restored.
fn install_pagehide(window: &web_sys::Window) -> Result<()> {
    if PAGEHIDE.with(|slot| slot.borrow().is_some()) {
        return Ok(());
    }
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(|event: web_sys::Event| {
        let persisted = event
            .dyn_ref::<PageTransitionEvent>()
            .is_some_and(PageTransitionEvent::persisted);
        if persisted {
            debug!("Page entering back/forward cache; keeping runtime");
            return;
        }
        teardown();
    });
    window
        .add_event_listener_with_callback("pagehide", callback.as_ref().unchecked_ref())
        .js_context("Registering pagehide listener failed")?;
    PAGEHIDE.with(|slot| *slot.borrow_mut() = Some(callback));
    Ok(())
}
