use crate::env::{
    EventKind, Host, IntersectionOptions, ListenTarget, NodeId, Owner, ScrollBehavior, Token,
};
use std::collections::BTreeSet;
use std::time::Duration;

/// Describes work that must be performed outside the pure reducers.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RenderIcons,
    AddClass {
        node: NodeId,
        class: String,
    },
    RemoveClass {
        node: NodeId,
        class: String,
    },
    SetStyle {
        node: NodeId,
        property: &'static str,
        value: String,
    },
    SetText {
        node: NodeId,
        text: String,
    },
    ScrollTo {
        top: f64,
        behavior: ScrollBehavior,
    },
    /// Suppress the browser's default action for the event being dispatched.
    PreventDefault,
    Listen {
        token: Token,
        target: ListenTarget,
        kind: EventKind,
    },
    Unlisten(Token),
    SetTimeout {
        token: Token,
        delay: Duration,
    },
    ClearTimeout(Token),
    RequestFrame(Token),
    CancelFrame(Token),
    Observe {
        token: Token,
        targets: Vec<NodeId>,
        options: IntersectionOptions,
    },
    Disconnect(Token),
}

/// Apply one effect to the host. Returns `true` for [`Effect::PreventDefault`].
pub fn apply_effect<H: Host + ?Sized>(host: &mut H, effect: Effect) -> bool {
    match effect {
        Effect::RenderIcons => host.render_icons(),
        Effect::AddClass { node, class } => host.add_class(node, &class),
        Effect::RemoveClass { node, class } => host.remove_class(node, &class),
        Effect::SetStyle {
            node,
            property,
            value,
        } => host.set_style(node, property, &value),
        Effect::SetText { node, text } => host.set_text(node, &text),
        Effect::ScrollTo { top, behavior } => host.scroll_to(top, behavior),
        Effect::PreventDefault => return true,
        Effect::Listen {
            token,
            target,
            kind,
        } => host.listen(token, target, kind),
        Effect::Unlisten(token) => host.unlisten(token),
        Effect::SetTimeout { token, delay } => host.set_timeout(token, delay),
        Effect::ClearTimeout(token) => host.clear_timeout(token),
        Effect::RequestFrame(token) => host.request_frame(token),
        Effect::CancelFrame(token) => host.cancel_frame(token),
        Effect::Observe {
            token,
            targets,
            options,
        } => host.observe(token, &targets, options),
        Effect::Disconnect(token) => host.disconnect(token),
    }
    false
}

/// Callback registrations held by one owner, so they can be released together.
#[derive(Debug)]
pub(crate) struct Bindings {
    owner: Owner,
    next_slot: u32,
    listeners: Vec<Token>,
    timers: BTreeSet<Token>,
    frames: BTreeSet<Token>,
    observers: Vec<Token>,
}

impl Bindings {
    pub(crate) fn new(owner: Owner) -> Self {
        Bindings {
            owner,
            next_slot: 0,
            listeners: Vec::new(),
            timers: BTreeSet::new(),
            frames: BTreeSet::new(),
            observers: Vec::new(),
        }
    }

    fn mint(&mut self) -> Token {
        let token = Token {
            owner: self.owner,
            slot: self.next_slot,
        };
        self.next_slot = self.next_slot.wrapping_add(1);
        token
    }

    pub(crate) fn listen(
        &mut self,
        target: ListenTarget,
        kind: EventKind,
        effects: &mut Vec<Effect>,
    ) -> Token {
        let token = self.mint();
        self.listeners.push(token);
        effects.push(Effect::Listen {
            token,
            target,
            kind,
        });
        token
    }

    pub(crate) fn set_timeout(&mut self, delay: Duration, effects: &mut Vec<Effect>) -> Token {
        let token = self.mint();
        self.timers.insert(token);
        effects.push(Effect::SetTimeout { token, delay });
        token
    }

    pub(crate) fn clear_timeout(&mut self, token: Token, effects: &mut Vec<Effect>) {
        if self.timers.remove(&token) {
            effects.push(Effect::ClearTimeout(token));
        }
    }

    /// Forget a timer that just fired. Returns whether it was still pending.
    pub(crate) fn timer_fired(&mut self, token: Token) -> bool {
        self.timers.remove(&token)
    }

    pub(crate) fn request_frame(&mut self, effects: &mut Vec<Effect>) -> Token {
        let token = self.mint();
        self.frames.insert(token);
        effects.push(Effect::RequestFrame(token));
        token
    }

    pub(crate) fn frame_fired(&mut self, token: Token) -> bool {
        self.frames.remove(&token)
    }

    pub(crate) fn observe(
        &mut self,
        targets: Vec<NodeId>,
        options: IntersectionOptions,
        effects: &mut Vec<Effect>,
    ) -> Token {
        let token = self.mint();
        self.observers.push(token);
        effects.push(Effect::Observe {
            token,
            targets,
            options,
        });
        token
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.listeners.is_empty()
            && self.timers.is_empty()
            && self.frames.is_empty()
            && self.observers.is_empty()
    }

    /// Unregister everything still held.
    pub(crate) fn release(&mut self, effects: &mut Vec<Effect>) {
        effects.extend(self.listeners.drain(..).map(Effect::Unlisten));
        effects.extend(
            std::mem::take(&mut self.timers)
                .into_iter()
                .map(Effect::ClearTimeout),
        );
        effects.extend(
            std::mem::take(&mut self.frames)
                .into_iter()
                .map(Effect::CancelFrame),
        );
        effects.extend(self.observers.drain(..).map(Effect::Disconnect));
    }
}
