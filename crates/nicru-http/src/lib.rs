//! HTTP client wrapper for the Nic.ru registrar REST API.
//!
//! `HttpClient` assembles requests from a base URL, persistent headers and
//! per-call parameters, runs registered listeners around each send and
//! delegates the actual exchange to a pluggable `Transport`. The default
//! transport is backed by reqwest.

pub mod client;
pub mod listener;
pub mod message;
pub mod options;
pub mod response;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::HttpClient;
pub use listener::{Listener, Listeners, TracingListener};
pub use message::{Method, RawResponse, Request};
pub use nicru_error::{ErrorKind, NicRuError, Result};
pub use options::ClientOptions;
pub use response::Response;
pub use transport::{ReqwestTransport, Transport, TransportError};
