//! Caller-supplied request descriptions.
//!
//! # Design
//! A `RequestDescriptor` says what a request looks like without building it:
//! path, method, headers, timeout, and two functions that derive URL and body
//! parameters from the caller's base parameters. The builder decides which
//! base parameters each function receives (see `RequestBuilder::build`).
//!
//! `Endpoint` is a ready-made descriptor for the common case where a request
//! has a fixed set of query and body values on top of the base parameters.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;

use crate::http::{HttpMethod, DEFAULT_TIMEOUT};

/// Parameter mapping used for both query strings and JSON bodies.
pub type Parameters = serde_json::Map<String, Value>;

/// Header mapping copied verbatim onto built requests.
pub type Headers = BTreeMap<String, String>;

/// Describes the shape of a single HTTP request.
pub trait RequestDescriptor: Send + Sync {
    /// Path appended to the environment's base URL, including its leading `/`.
    fn path(&self) -> &str;

    fn method(&self) -> HttpMethod;

    fn headers(&self) -> Headers {
        Headers::new()
    }

    fn timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }

    /// Parameters to encode into the query string.
    fn url_params(&self, base: Option<&Parameters>) -> Option<Parameters>;

    /// Parameters to encode as the JSON body. Ignored for GET requests.
    fn body_params(&self, base: Option<&Parameters>) -> Option<Parameters>;
}

/// A descriptor with fixed query and body values.
///
/// Both parameter functions start from the base parameters and then apply the
/// endpoint's own values, so an endpoint value wins over a base value with the
/// same key.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    method: HttpMethod,
    path: String,
    headers: Headers,
    timeout: Duration,
    query: Parameters,
    body: Parameters,
}

impl Endpoint {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            timeout: DEFAULT_TIMEOUT,
            query: Parameters::new(),
            body: Parameters::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }
}

impl RequestDescriptor for Endpoint {
    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> HttpMethod {
        self.method
    }

    fn headers(&self) -> Headers {
        self.headers.clone()
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url_params(&self, base: Option<&Parameters>) -> Option<Parameters> {
        merge(base, &self.query)
    }

    fn body_params(&self, base: Option<&Parameters>) -> Option<Parameters> {
        merge(base, &self.body)
    }
}

fn merge(base: Option<&Parameters>, own: &Parameters) -> Option<Parameters> {
    let mut merged = base.cloned().unwrap_or_default();
    merged.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
    if merged.is_empty() {
        None
    } else {
        Some(merged)
    }
}
