//! Test doubles shared by the unit tests.

use crate::listener::Listener;
use crate::message::{RawResponse, Request};
use crate::options::ClientOptions;
use crate::transport::{Transport, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// What the mock does on the next `send`.
pub enum Reply {
    Ok(RawResponse),
    Logic(String),
    Runtime(String),
    Other(String),
}

/// Transport that replays scripted replies and records what it was sent.
#[derive(Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    sent: Arc<Mutex<Vec<(Request, ClientOptions)>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: Reply) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn sent(&self) -> Vec<(Request, ClientOptions)> {
        self.sent.lock().unwrap().clone()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Unclassified(pub String);

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        request: &Request,
        options: &ClientOptions,
    ) -> Result<RawResponse, TransportError> {
        self.sent
            .lock()
            .unwrap()
            .push((request.clone(), options.clone()));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::Ok(RawResponse::new(200)));
        match reply {
            Reply::Ok(response) => Ok(response),
            Reply::Logic(msg) => Err(TransportError::Logic(msg)),
            Reply::Runtime(msg) => Err(TransportError::Runtime(msg)),
            Reply::Other(msg) => Err(TransportError::Other(Box::new(Unclassified(msg)))),
        }
    }
}

#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Records hook calls and tags the request.
pub struct Recorder {
    name: &'static str,
    log: EventLog,
}

impl Recorder {
    pub fn new(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: log.clone(),
        }
    }
}

impl Listener for Recorder {
    fn pre_send(&self, request: &mut Request) {
        self.log.push(format!("{}:pre", self.name));
        request.set_header("X-Seen-By", self.name);
    }

    fn post_send(&self, _request: &Request, response: &RawResponse) {
        self.log.push(format!("{}:post:{}", self.name, response.status));
    }
}

/// Signs the request from whatever earlier listeners left on it.
pub struct Signer {
    key: &'static str,
}

impl Signer {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl Listener for Signer {
    fn pre_send(&self, request: &mut Request) {
        let seen = request.header("X-Seen-By").unwrap_or("nobody").to_string();
        request.set_header("X-Signature", format!("{}:{}", self.key, seen));
    }
}
