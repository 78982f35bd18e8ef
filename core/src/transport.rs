//! Transport abstraction and the default `reqwest` implementation.
//!
//! # Design
//! The crate never performs I/O directly. A `Transport` receives a finished
//! `HttpRequest` and returns the status, headers and full body. Connection
//! handling, TLS and timeouts are entirely the transport's business; the only
//! knob passed through is the per-request timeout.

use std::future::Future;

use tracing::trace;

use crate::error::{TransportError, DEFAULT_ERROR_CODE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes built requests.
pub trait Transport: Send + Sync + 'static {
    type Error: TransportError;

    /// Execute `request` and read the complete response body.
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;
}

/// `Transport` backed by a `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    type Error = reqwest::Error;

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, request.url)
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?;
        trace!(status, bytes = body.len(), "transport response read");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl TransportError for reqwest::Error {
    /// The HTTP status when reqwest attached one, otherwise the first OS error
    /// code found in the source chain, otherwise 500.
    fn code(&self) -> i32 {
        if let Some(status) = self.status() {
            return i32::from(status.as_u16());
        }
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            if let Some(code) = err
                .downcast_ref::<std::io::Error>()
                .and_then(std::io::Error::raw_os_error)
            {
                return code;
            }
            source = err.source();
        }
        DEFAULT_ERROR_CODE
    }
}
