//! Request dispatcher for the Nic.ru REST API.
//!
//! Every verb funnels into `request`, which builds the `Request`, runs the
//! pre-send listeners, hands it to the transport, and on success records
//! the exchange and runs the post-send listeners. A failed send changes
//! nothing: the last request/response stay as they were and no post-send
//! listener runs.

use crate::listener::{Listener, Listeners};
use crate::message::{append_query, encode_params, merge_header, Method, RawResponse, Request};
use crate::options::ClientOptions;
use crate::response::Response;
use crate::transport::{ReqwestTransport, Transport, TransportError};
use nicru_error::{NicRuError, Result};
use serde_json::Value;
use std::collections::HashMap;

pub struct HttpClient {
    base_url: String,
    options: ClientOptions,
    transport: Box<dyn Transport>,
    headers: HashMap<String, String>,
    listeners: Listeners,
    last_request: Option<Request>,
    last_response: Option<RawResponse>,
}

impl HttpClient {
    pub fn new(
        base_url: impl Into<String>,
        options: ClientOptions,
        transport: impl Transport + 'static,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            options,
            transport: Box::new(transport),
            headers: HashMap::new(),
            listeners: Listeners::new(),
            last_request: None,
            last_response: None,
        }
    }

    pub fn with_reqwest(base_url: impl Into<String>, options: ClientOptions) -> Self {
        Self::new(base_url, options, ReqwestTransport::new())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn set_option(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.options.set(name, value)
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Merge into the headers sent with every request until cleared.
    /// Names are matched case-insensitively.
    pub fn set_headers<K, V>(&mut self, headers: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            merge_header(&mut self.headers, name.into(), value.into());
        }
    }

    pub fn clear_headers(&mut self) {
        self.headers.clear();
    }

    pub fn add_listener<L: Listener>(&mut self, listener: L) {
        self.listeners.insert(listener);
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn last_request(&self) -> Option<&Request> {
        self.last_request.as_ref()
    }

    pub fn last_response(&self) -> Option<&RawResponse> {
        self.last_response.as_ref()
    }

    /// Parameters go into the query string; GET never carries a body.
    pub async fn get(
        &mut self,
        path: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Response> {
        let path = append_query(path, params)?;
        self.request(&path, &[], Method::Get, headers).await
    }

    pub async fn post(
        &mut self,
        path: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Response> {
        self.request(path, params, Method::Post, headers).await
    }

    pub async fn put(
        &mut self,
        path: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Response> {
        self.request(path, params, Method::Put, headers).await
    }

    pub async fn patch(
        &mut self,
        path: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Response> {
        self.request(path, params, Method::Patch, headers).await
    }

    pub async fn delete(
        &mut self,
        path: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Response> {
        self.request(path, params, Method::Delete, headers).await
    }

    pub async fn request(
        &mut self,
        path: &str,
        params: &[(&str, &str)],
        method: Method,
        headers: &[(&str, &str)],
    ) -> Result<Response> {
        let mut request = self.build_request(method, path);
        request.add_headers(headers.iter().copied());
        request.body = encode_params(params)?;

        self.listeners.run_pre_send(&mut request);

        tracing::debug!(method = %request.method, url = %request.url, "dispatching request");
        let response = match self.transport.send(&request, &self.options).await {
            Ok(response) => response,
            Err(err) => {
                let err = translate(err);
                tracing::warn!(
                    method = %request.method,
                    url = %request.url,
                    kind = %err.kind(),
                    error = %err,
                    "transport failed"
                );
                return Err(err);
            }
        };
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            "request completed"
        );

        let result = Response::new(response.clone());
        self.last_request = Some(request);
        self.last_response = Some(response);
        if let (Some(request), Some(response)) = (&self.last_request, &self.last_response) {
            self.listeners.run_post_send(request, response);
        }

        Ok(result)
    }

    fn build_request(&self, method: Method, path: &str) -> Request {
        let url = format!("{}{}", self.base_url, path)
            .trim_matches('/')
            .to_string();
        let mut request = Request::new(method, url);
        request.add_headers(
            self.headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        request
    }
}

fn translate(err: TransportError) -> NicRuError {
    match err {
        TransportError::Logic(msg) => NicRuError::Error(msg),
        TransportError::Runtime(msg) => NicRuError::Runtime(msg),
        TransportError::Other(source) => NicRuError::Other(source),
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .field("headers", &self.headers)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
