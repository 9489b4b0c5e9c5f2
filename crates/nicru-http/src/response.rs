use crate::message::{find_header, RawResponse};
use nicru_error::Result;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::collections::HashMap;

/// Caller-facing response returned by every verb on `HttpClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    raw: RawResponse,
}

impl Response {
    pub fn new(raw: RawResponse) -> Self {
        Self { raw }
    }

    pub fn status(&self) -> u16 {
        self.raw.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.raw.status)
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.raw.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.raw.headers, name)
    }

    pub fn body(&self) -> &[u8] {
        &self.raw.body
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.raw.body)?)
    }

    pub fn into_raw(self) -> RawResponse {
        self.raw
    }
}

impl From<RawResponse> for Response {
    fn from(raw: RawResponse) -> Self {
        Self::new(raw)
    }
}
