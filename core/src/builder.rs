//! Turns a `RequestDescriptor` into an `HttpRequest`.
//!
//! # Design
//! `RequestBuilder` holds the `Environment` and an injected `CookieStore` and
//! carries no other state, so one builder can serve any number of calls. The
//! URL comes from the override URI when it parses, otherwise from the
//! environment's base URL plus the descriptor path.
//!
//! The request method picks the encoding rules:
//!
//! | method  | url params from | body params from | encoding      |
//! |---------|-----------------|------------------|---------------|
//! | GET     | base            | `None`           | query only    |
//! | others  | base            | base             | query + JSON  |

use std::sync::Arc;

use tracing::{debug, trace};
use url::Url;

use crate::cookies::{CookieStore, NoCookieStore};
use crate::descriptor::{Parameters, RequestDescriptor};
use crate::encoding::ParameterEncoding;
use crate::environment::Environment;
use crate::error::{NetworkError, Result};
use crate::http::{HttpMethod, HttpRequest};

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    environment: Environment,
    cookies: Arc<dyn CookieStore>,
}

impl RequestBuilder {
    pub fn new(environment: Environment) -> Self {
        Self::with_cookie_store(environment, Arc::new(NoCookieStore))
    }

    pub fn with_cookie_store(environment: Environment, cookies: Arc<dyn CookieStore>) -> Self {
        Self {
            environment,
            cookies,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Build the request for `descriptor`.
    ///
    /// Fails with `MissingUrl` when no valid URL can be resolved, or with
    /// `ParseFailed` when the parameters cannot be encoded. The cookie store
    /// is cleared as soon as the request object exists, before encoding.
    pub fn build<D>(
        &self,
        uri: Option<&str>,
        descriptor: &D,
        base_params: Option<&Parameters>,
    ) -> Result<HttpRequest>
    where
        D: RequestDescriptor + ?Sized,
    {
        let url = self.resolve_url(uri, descriptor.path())?;
        let method = descriptor.method();

        let mut request = HttpRequest::new(method, url);
        request.timeout = descriptor.timeout();
        request.headers = descriptor.headers().into_iter().collect();

        trace!("clearing cookie store");
        self.cookies.clear();

        let (encoding, body_base) = match method {
            HttpMethod::Get => (ParameterEncoding::Url, None),
            _ => (ParameterEncoding::UrlAndJson, base_params),
        };
        let url_params = descriptor.url_params(base_params);
        let body_params = descriptor.body_params(body_base);
        encoding.encode(&mut request, url_params.as_ref(), body_params.as_ref())?;

        debug!(
            method = %request.method,
            url = %request.url,
            has_body = request.body.is_some(),
            "built request"
        );
        Ok(request)
    }

    fn resolve_url(&self, uri: Option<&str>, path: &str) -> Result<Url> {
        if let Some(url) = uri.and_then(|raw| Url::parse(raw).ok()) {
            return Ok(url);
        }
        let joined = format!("{}{}", self.environment.base_url(), path);
        Url::parse(&joined).map_err(|_| NetworkError::MissingUrl)
    }
}
