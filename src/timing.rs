//! Rate-limiting wrappers for callbacks.
//!
//! Both wrappers schedule through [`Effect`]s like the controllers do, so the
//! caller applies the effects to its host and feeds fired timers back through
//! `on_timer`. Tokens carry [`Owner::Utility`] with the id given at
//! construction.

use crate::env::{Owner, Token};
use crate::page::Effect;
use crate::page::effects::Bindings;
use std::time::Duration;

/// Runs the callback once calls stop for `wait`, with the latest arguments.
pub struct Debounce<A> {
    wait: Duration,
    callback: Box<dyn FnMut(A)>,
    pending: Option<(Token, A)>,
    bindings: Bindings,
}

impl<A> Debounce<A> {
    pub fn new(id: u16, wait: Duration, callback: impl FnMut(A) + 'static) -> Self {
        Debounce {
            wait,
            callback: Box::new(callback),
            pending: None,
            bindings: Bindings::new(Owner::Utility(id)),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Restart the delay, replacing any arguments still waiting.
    pub fn call(&mut self, args: A, effects: &mut Vec<Effect>) {
        if let Some((token, _)) = self.pending.take() {
            self.bindings.clear_timeout(token, effects);
        }
        let token = self.bindings.set_timeout(self.wait, effects);
        self.pending = Some((token, args));
    }

    /// Returns whether the token belonged to this wrapper's live timer, in
    /// which case the callback has run.
    pub fn on_timer(&mut self, token: Token) -> bool {
        if !self.bindings.timer_fired(token) {
            return false;
        }
        match self.pending.take() {
            Some((pending, args)) if pending == token => {
                (self.callback)(args);
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Drop the pending call without running it.
    pub fn cancel(&mut self, effects: &mut Vec<Effect>) {
        self.pending = None;
        self.bindings.release(effects);
    }
}

/// Runs the callback at most once per `limit`. Calls inside the window are
/// dropped, not queued.
pub struct Throttle<A> {
    limit: Duration,
    callback: Box<dyn FnMut(A)>,
    cooldown: Option<Token>,
    bindings: Bindings,
}

impl<A> Throttle<A> {
    pub fn new(id: u16, limit: Duration, callback: impl FnMut(A) + 'static) -> Self {
        Throttle {
            limit,
            callback: Box::new(callback),
            cooldown: None,
            bindings: Bindings::new(Owner::Utility(id)),
        }
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown.is_some()
    }

    /// Returns whether the callback ran.
    pub fn call(&mut self, args: A, effects: &mut Vec<Effect>) -> bool {
        if self.cooldown.is_some() {
            return false;
        }
        (self.callback)(args);
        self.cooldown = Some(self.bindings.set_timeout(self.limit, effects));
        true
    }

    /// Close the suppression window when its timer fires.
    pub fn on_timer(&mut self, token: Token) -> bool {
        if self.cooldown != Some(token) || !self.bindings.timer_fired(token) {
            return false;
        }
        self.cooldown = None;
        true
    }

    pub fn cancel(&mut self, effects: &mut Vec<Effect>) {
        self.cooldown = None;
        self.bindings.release(effects);
    }
}
