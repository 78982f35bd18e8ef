//! Declarative HTTP request building and dispatch.
//!
//! # Overview
//! Callers describe a request with a `RequestDescriptor` (path, method,
//! headers, parameter rules). `RequestBuilder` resolves it against an
//! `Environment` into an `HttpRequest`, and `Dispatcher` executes it through a
//! pluggable `Transport`, returning a `Response` for status 200 and a
//! `NetworkError` for everything else.
//!
//! # Design
//! - The core performs no I/O of its own; `ReqwestTransport` is the default
//!   transport and any other client can implement `Transport`.
//! - GET requests carry parameters in the query string only. Other methods
//!   also send a JSON body, and base parameters are merged into both.
//! - One internal fetch path backs the async, callback and stream forms.
//! - The builder empties an injected `CookieStore` before every request, so
//!   no session state survives between calls.

pub mod builder;
pub mod cookies;
pub mod descriptor;
pub mod dispatcher;
pub mod encoding;
pub mod environment;
pub mod error;
pub mod http;
pub mod response;
pub mod service;
pub mod transport;

pub use builder::RequestBuilder;
pub use cookies::{CookieStore, NoCookieStore};
pub use descriptor::{Endpoint, Headers, Parameters, RequestDescriptor};
pub use dispatcher::Dispatcher;
pub use encoding::ParameterEncoding;
pub use environment::{Environment, Scheme};
pub use error::{ConfigError, NetworkError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::Response;
pub use service::Service;
pub use transport::{ReqwestTransport, Transport};
