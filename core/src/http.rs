//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and interprets `HttpResponse` values; the
//! actual network round-trip happens behind the `Transport` trait, which the
//! host implements with whatever HTTP client it already uses (TLS, retries and
//! timeouts live there).
//!
//! Header names are stored lowercased in a `BTreeMap`, so keys are unique and
//! iteration order is deterministic.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::TransportError;

/// Header map with lowercased names.
pub type Headers = BTreeMap<String, String>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `RequestBuilder::build`. Consumed by a `Transport`; nothing in
/// this crate keeps a reference to it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport` after executing an `HttpRequest`. Header names
/// should be lowercased by the transport; `header` lowercases the lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// The host side of the I/O boundary.
///
/// Implementations execute one request synchronously and return the raw
/// response, including 4xx/5xx statuses. Only failures to obtain a response
/// at all (connect, TLS, timeout) are reported as `TransportError`.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}
