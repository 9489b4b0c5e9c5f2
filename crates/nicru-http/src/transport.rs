//! Transport capability and the default reqwest-backed implementation.
//!
//! The client never touches the network itself. It hands a finished
//! `Request` plus the current `ClientOptions` to a `Transport` and gets a
//! `RawResponse` back, or a `TransportError` saying what class of failure
//! happened.

use crate::message::{Method, RawResponse, Request};
use crate::options::ClientOptions;
use nicru_error::BoxError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Url};
use std::collections::HashMap;
use thiserror::Error;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Error, Debug)]
pub enum TransportError {
    /// The request itself is wrong: bad URL, bad header, refused by the
    /// builder. Sending it again will not help.
    #[error("{0}")]
    Logic(String),
    /// The exchange failed on the way: connect, timeout, I/O.
    #[error("{0}")]
    Runtime(String),
    #[error(transparent)]
    Other(BoxError),
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &Request,
        options: &ClientOptions,
    ) -> Result<RawResponse, TransportError>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    fn header_map(request: &Request, options: &ClientOptions) -> Result<HeaderMap, TransportError> {
        let mut map = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::Logic(format!("Invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::Logic(format!("Invalid value for header {}: {}", name, e)))?;
            map.insert(name, value);
        }

        if !map.contains_key(USER_AGENT) {
            let agent = HeaderValue::from_str(&options.user_agent)
                .map_err(|e| TransportError::Logic(format!("Invalid user agent: {}", e)))?;
            map.insert(USER_AGENT, agent);
        }
        if !request.body.is_empty() && !map.contains_key(CONTENT_TYPE) {
            map.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        }
        Ok(map)
    }

    /// Repeated headers are joined with `", "`; values that are not UTF-8
    /// are decoded lossily.
    fn collect_headers(map: &HeaderMap) -> HashMap<String, String> {
        let mut headers: HashMap<String, String> = HashMap::new();
        for (name, value) in map {
            let value = String::from_utf8_lossy(value.as_bytes());
            match headers.get_mut(name.as_str()) {
                Some(existing) => {
                    existing.push_str(", ");
                    existing.push_str(&value);
                }
                None => {
                    headers.insert(name.as_str().to_string(), value.into_owned());
                }
            }
        }
        headers
    }

    fn classify(err: reqwest::Error) -> TransportError {
        if err.is_builder() {
            TransportError::Logic(err.to_string())
        } else if err.is_timeout()
            || err.is_connect()
            || err.is_request()
            || err.is_body()
            || err.is_decode()
        {
            TransportError::Runtime(err.to_string())
        } else {
            TransportError::Other(Box::new(err))
        }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &Request,
        options: &ClientOptions,
    ) -> Result<RawResponse, TransportError> {
        let url = Url::parse(&request.url)
            .map_err(|e| TransportError::Logic(format!("Invalid URL {}: {}", request.url, e)))?;
        let headers = Self::header_map(request, options)?;

        let mut builder = self
            .client
            .request(Self::method(request.method), url)
            .headers(headers);
        // zero means no per-request timeout
        if options.timeout > 0 {
            builder = builder.timeout(options.timeout_duration());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let resp = builder.send().await.map_err(Self::classify)?;

        let status = resp.status().as_u16();
        let headers = Self::collect_headers(resp.headers());
        let body = resp.bytes().await.map_err(Self::classify)?.to_vec();

        Ok(RawResponse { status, headers, body })
    }
}
