//! Request descriptor for a single JSON round trip.
//!
//! # Design
//! A `JsonRequest` describes one HTTP exchange as plain owned data: method,
//! URL, headers, an optional pre-serialized JSON body and the round-trip
//! timeout. It is built by the caller (or by `get`/`post`) and consumed by
//! `client::execute`, which is the only place that touches the network.
//!
//! Header names are stored lowercased so that setting a header replaces any
//! earlier value regardless of the caller's casing.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use crate::error::{FetchError, Result};

/// Extra headers supplied by the caller. Each entry replaces any header of
/// the same name already present on the request.
pub type Headers = HashMap<String, String>;

pub const CONTENT_TYPE: &str = "content-type";
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP method for a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// One outgoing request, described as plain data.
#[derive(Debug, Clone)]
pub struct JsonRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    /// Applies to the whole exchange. `Duration::ZERO` disables the limit.
    pub timeout: Duration,
}

impl JsonRequest {
    /// A GET with no body and no default headers.
    pub fn get(url: &str) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
            timeout: Duration::ZERO,
        }
    }

    /// A POST carrying the JSON encoding of `body`.
    ///
    /// `None` and `()` encode as the JSON literal `null`. The request starts
    /// out with `content-type: application/json`, which caller headers may
    /// override.
    pub fn post<B: Serialize + ?Sized>(url: &str, body: &B) -> Result<Self> {
        let body = serde_json::to_vec(body).map_err(FetchError::Serialize)?;
        Ok(Self {
            method: HttpMethod::Post,
            url: url.to_string(),
            headers: vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())],
            body: Some(body),
            timeout: Duration::ZERO,
        })
    }

    /// Set a header, replacing any existing value for the same name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        self.headers.retain(|(existing, _)| *existing != name);
        self.headers.push((name, value.to_string()));
    }

    pub fn with_headers(mut self, headers: &Headers) -> Self {
        for (name, value) in headers {
            self.set_header(name, value);
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Current value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_has_no_body_and_no_headers() {
        let req = JsonRequest::get("http://localhost:3000/item");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/item");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
        assert_eq!(req.timeout, Duration::ZERO);
    }

    #[test]
    fn post_serializes_body_and_sets_content_type() {
        let req = JsonRequest::post("http://localhost:3000/echo", &serde_json::json!({"a": 1})).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("Content-Type"), Some(APPLICATION_JSON));
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"a": 1}));
    }

    #[test]
    fn post_none_body_is_json_null() {
        let req = JsonRequest::post("http://localhost:3000/echo", &None::<u32>).unwrap();
        assert_eq!(req.body.as_deref(), Some(&b"null"[..]));

        let req = JsonRequest::post("http://localhost:3000/echo", &()).unwrap();
        assert_eq!(req.body.as_deref(), Some(&b"null"[..]));
    }

    #[test]
    fn post_unserializable_body_is_rejected() {
        let mut map = HashMap::new();
        map.insert(vec![1u8], "non-string key");
        let err = JsonRequest::post("http://localhost:3000/echo", &map).unwrap_err();
        assert!(matches!(err, FetchError::Serialize(_)));
    }

    #[test]
    fn caller_header_overrides_default_content_type() {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "text/plain".to_string());
        let req = JsonRequest::post("http://localhost:3000/echo", &1)
            .unwrap()
            .with_headers(&headers);
        assert_eq!(req.header(CONTENT_TYPE), Some("text/plain"));
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn set_header_replaces_instead_of_appending() {
        let mut req = JsonRequest::get("http://localhost:3000/item");
        req.set_header("X-Trace", "one");
        req.set_header("x-trace", "two");
        assert_eq!(req.headers, vec![("x-trace".to_string(), "two".to_string())]);
    }

    #[test]
    fn method_names() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
    }
}
