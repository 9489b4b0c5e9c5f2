//! Request and response messages exchanged with the transport.
//!
//! `Request` is built by the client, may be adjusted by listeners, and is
//! handed to the transport by reference. `RawResponse` is what the transport
//! fills in; the client wraps it into the caller-facing `Response`.

use nicru_error::{NicRuError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP verbs the API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    /// Set one header, replacing a previous value under the same name
    /// compared case-insensitively.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        merge_header(&mut self.headers, name.into(), value.into());
    }

    /// Merge headers in; later entries win.
    pub fn add_headers<K, V>(&mut self, headers: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.set_header(name, value);
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Response as produced by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// Insert `name`, dropping any key that differs from it only in case.
pub(crate) fn merge_header(headers: &mut HashMap<String, String>, name: String, value: String) {
    headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}

pub(crate) fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Encode `(key, value)` pairs as `application/x-www-form-urlencoded`,
/// keeping their order.
pub fn encode_params(params: &[(&str, &str)]) -> Result<String> {
    if params.is_empty() {
        return Ok(String::new());
    }
    serde_urlencoded::to_string(params).map_err(|e| NicRuError::Error(e.to_string()))
}

/// Fold `params` into `path` as a query string.
pub fn append_query(path: &str, params: &[(&str, &str)]) -> Result<String> {
    if params.is_empty() {
        return Ok(path.to_string());
    }
    let separator = if path.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}{}", path, separator, encode_params(params)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_tokens() {
        assert_eq!(Method::Patch.as_str(), "PATCH");
        assert_eq!(Method::Delete.to_string(), "DELETE");
        let json = serde_json::to_string(&Method::Get).expect("serialize method");
        assert_eq!(json, "\"GET\"");
    }

    #[test]
    fn encode_params_keeps_order_and_escapes() {
        let body = encode_params(&[("name", "example.com"), ("contact", "John Doe & Co")])
            .expect("encode params");
        assert_eq!(body, "name=example.com&contact=John+Doe+%26+Co");
        assert_eq!(encode_params(&[]).expect("empty params"), "");
    }

    #[test]
    fn append_query_picks_separator() {
        let path = append_query("domain/list", &[("page", "2"), ("limit", "50")])
            .expect("append query");
        assert_eq!(path, "domain/list?page=2&limit=50");

        let path = append_query("domain/list?zone=ru", &[("page", "2")]).expect("append query");
        assert_eq!(path, "domain/list?zone=ru&page=2");

        let path = append_query("domain/list", &[]).expect("no params");
        assert_eq!(path, "domain/list");
    }

    #[test]
    fn request_headers_merge_and_lookup() {
        let mut request = Request::new(Method::Post, "https://api.example.com/order");
        request.add_headers([("Accept", "text/xml"), ("X-Trace", "1")]);
        request.add_headers([("Accept", "application/json")]);
        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("missing"), None);
    }

    #[test]
    fn set_header_replaces_across_case() {
        let mut request = Request::new(Method::Post, "https://api.example.com/order");
        request.set_header("Content-Type", "text/xml");
        request.set_header("content-type", "application/json");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(
            request.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(request.header("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn raw_response_builders() {
        let response = RawResponse::new(201)
            .with_header("Content-Type", "text/plain")
            .with_body("created");
        assert_eq!(response.status, 201);
        assert_eq!(response.body, b"created".to_vec());
        assert_eq!(RawResponse::default().status, 0);
    }
}
