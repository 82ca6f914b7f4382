//! ContextGate: Holds back GPU-dependent messages while no context is current.
//!
//! The render thread can lose its GPU context (surface destroyed, app sent to
//! background). Messages flagged GL-context-dependent are parked in arrival
//! order and replayed once a context is current again. While anything is
//! parked, later non-blocking messages queue behind it so replay keeps post
//! order; blocking queries still pass straight through and never wait for a
//! context. Before the first deferral, CPU-only messages keep flowing.
//! Parked messages are never discarded by the gate: they are either replayed
//! or dropped together with it, and dropping still releases any blocker they
//! carry.

use crate::message::Message;
use std::collections::VecDeque;

/// Deferral buffer for GL-context-dependent messages.
#[derive(Debug)]
pub struct ContextGate {
    deferred: VecDeque<Message>,
    context_current: bool,
    warn_threshold: usize,
    warned: bool,
}

impl ContextGate {
    /// Create a gate. `context_current` is the initial context state.
    pub const fn new(context_current: bool, warn_threshold: usize) -> Self {
        Self {
            deferred: VecDeque::new(),
            context_current,
            warn_threshold,
            warned: false,
        }
    }

    /// Whether a context is currently bound.
    pub const fn is_context_current(&self) -> bool {
        self.context_current
    }

    /// Number of messages waiting for a context.
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Apply `message` now, or park it if it needs a context that is not
    /// current or would overtake a parked message.
    ///
    /// Returns `true` if the message was applied.
    pub fn submit<F>(&mut self, message: Message, mut apply: F) -> bool
    where
        F: FnMut(Message),
    {
        if !self.must_wait(&message) {
            apply(message);
            return true;
        }

        tracing::debug!(kind = ?message.kind(), "deferring message until context is current");
        self.deferred.push_back(message);
        if !self.warned && self.deferred.len() >= self.warn_threshold {
            self.warned = true;
            tracing::warn!(
                deferred = self.deferred.len(),
                "GL-dependent messages are piling up without a context"
            );
        }
        false
    }

    fn must_wait(&self, message: &Message) -> bool {
        if self.context_current || message.is_blocking() {
            return false;
        }
        message.is_gl_context_dependent() || !self.deferred.is_empty()
    }

    /// Record that the context is gone. Later GL-dependent messages are parked.
    pub fn context_lost(&mut self) {
        if self.context_current {
            tracing::info!("GPU context lost");
        }
        self.context_current = false;
    }

    /// Record that a context is current and replay parked messages in order.
    ///
    /// Returns the number of messages replayed.
    pub fn context_restored<F>(&mut self, mut apply: F) -> usize
    where
        F: FnMut(Message),
    {
        self.context_current = true;
        self.warned = false;
        let replayed = self.deferred.len();
        while let Some(message) = self.deferred.pop_front() {
            apply(message);
        }
        if replayed > 0 {
            tracing::info!(replayed, "replayed deferred messages on restored context");
        }
        replayed
    }

    /// Bring the gate in line with the actual context state.
    pub fn sync<F>(&mut self, context_current: bool, apply: F) -> usize
    where
        F: FnMut(Message),
    {
        match (self.context_current, context_current) {
            (false, true) => self.context_restored(apply),
            (true, false) => {
                self.context_lost();
                0
            }
            _ => 0,
        }
    }
}
