//! Hooks run around every send.
//!
//! At most one listener per concrete type is registered. Registering the
//! same type again swaps the instance but keeps the slot it was first
//! registered in, so calling order stays stable.

use crate::message::{RawResponse, Request};
use std::any::TypeId;

pub trait Listener: Send + Sync + 'static {
    /// Called before the transport sees the request; may adjust it.
    fn pre_send(&self, _request: &mut Request) {}

    /// Called after a successful send.
    fn post_send(&self, _request: &Request, _response: &RawResponse) {}
}

#[derive(Default)]
pub struct Listeners {
    entries: Vec<(TypeId, Box<dyn Listener>)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<L: Listener>(&mut self, listener: L) {
        let id = TypeId::of::<L>();
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some(slot) => slot.1 = Box::new(listener),
            None => self.entries.push((id, Box::new(listener))),
        }
    }

    pub fn remove<L: Listener>(&mut self) -> bool {
        let id = TypeId::of::<L>();
        let before = self.entries.len();
        self.entries.retain(|(key, _)| *key != id);
        self.entries.len() != before
    }

    pub fn contains<L: Listener>(&self) -> bool {
        let id = TypeId::of::<L>();
        self.entries.iter().any(|(key, _)| *key == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn run_pre_send(&self, request: &mut Request) {
        for (_, listener) in &self.entries {
            listener.pre_send(request);
        }
    }

    pub fn run_post_send(&self, request: &Request, response: &RawResponse) {
        for (_, listener) in &self.entries {
            listener.post_send(request, response);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// Logs every exchange at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl Listener for TracingListener {
    fn pre_send(&self, request: &mut Request) {
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            body_len = request.body.len(),
            "sending request"
        );
    }

    fn post_send(&self, request: &Request, response: &RawResponse) {
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            body_len = response.body.len(),
            "received response"
        );
    }
}
