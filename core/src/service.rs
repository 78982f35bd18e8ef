//! A dispatcher bound to a fixed set of base parameters.
//!
//! API clients usually send the same parameters (API key, locale, client
//! version) with every call. `Service` stores them once and passes them to
//! each fetch.

use crate::descriptor::{Parameters, RequestDescriptor};
use crate::dispatcher::Dispatcher;
use crate::environment::Environment;
use crate::error::Result;
use crate::response::Response;
use crate::transport::{ReqwestTransport, Transport};

#[derive(Debug)]
pub struct Service<T = ReqwestTransport> {
    dispatcher: Dispatcher<T>,
    base_parameters: Option<Parameters>,
}

impl Service<ReqwestTransport> {
    pub fn new(environment: Environment, base_parameters: Option<Parameters>) -> Self {
        Self::with_dispatcher(Dispatcher::new(environment), base_parameters)
    }
}

impl<T: Transport> Service<T> {
    pub fn with_dispatcher(dispatcher: Dispatcher<T>, base_parameters: Option<Parameters>) -> Self {
        Self {
            dispatcher,
            base_parameters,
        }
    }

    pub fn environment(&self) -> &Environment {
        self.dispatcher.environment()
    }

    pub fn base_parameters(&self) -> Option<&Parameters> {
        self.base_parameters.as_ref()
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    pub async fn fetch<D>(&self, descriptor: D) -> Result<Response>
    where
        D: RequestDescriptor + 'static,
    {
        self.dispatcher
            .fetch(None, descriptor, self.base_parameters.as_ref())
            .await
    }

    /// Fetch from `uri` instead of the environment, keeping the base parameters.
    pub async fn fetch_at<D>(&self, uri: &str, descriptor: D) -> Result<Response>
    where
        D: RequestDescriptor + 'static,
    {
        self.dispatcher
            .fetch(Some(uri), descriptor, self.base_parameters.as_ref())
            .await
    }

    pub fn cancel(&self) {
        self.dispatcher.cancel();
    }
}
