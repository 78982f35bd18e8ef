//! Dispatches descriptors through a transport and normalizes the outcome.
//!
//! # Design
//! Every calling convention funnels into `perform_fetch`, which runs on a
//! spawned tokio task:
//!
//! - `fetch` awaits the task and returns its `Result`.
//! - `fetch_with` hands the result to a callback, invoked exactly once from
//!   the runtime unless the request is cancelled.
//! - `fetch_stream` yields the result as a single stream item.
//!
//! The request is built synchronously before anything is spawned, so a build
//! failure never reaches the transport. The dispatcher keeps only the abort
//! handle of the most recently started task; `cancel` aborts that one.
//! Cancellation is best-effort: a task that has already finished delivers its
//! result anyway.
//!
//! All three conventions must be called from within a tokio runtime.

use std::future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::stream::{self, Stream, StreamExt};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, debug_span, trace, Instrument};
use uuid::Uuid;

use crate::builder::RequestBuilder;
use crate::cookies::CookieStore;
use crate::descriptor::{Parameters, RequestDescriptor};
use crate::environment::Environment;
use crate::error::{NetworkError, Result};
use crate::http::HttpRequest;
use crate::response::Response;
use crate::transport::{ReqwestTransport, Transport};

/// Only this status produces a `Response`.
const SUCCESS_STATUS: u16 = 200;

type FetchHandle = JoinHandle<Result<Response>>;

#[derive(Debug)]
pub struct Dispatcher<T = ReqwestTransport> {
    builder: RequestBuilder,
    transport: Arc<T>,
    task: Mutex<Option<AbortHandle>>,
}

impl Dispatcher<ReqwestTransport> {
    pub fn new(environment: Environment) -> Self {
        Self::with_transport(environment, ReqwestTransport::new())
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn with_transport(environment: Environment, transport: T) -> Self {
        Self {
            builder: RequestBuilder::new(environment),
            transport: Arc::new(transport),
            task: Mutex::new(None),
        }
    }

    /// Replace the cookie store cleared before each request.
    pub fn with_cookie_store(mut self, cookies: Arc<dyn CookieStore>) -> Self {
        self.builder = RequestBuilder::with_cookie_store(self.builder.environment().clone(), cookies);
        self
    }

    pub fn environment(&self) -> &Environment {
        self.builder.environment()
    }

    /// Fetch and await the result.
    pub async fn fetch<D>(
        &self,
        uri: Option<&str>,
        descriptor: D,
        base_params: Option<&Parameters>,
    ) -> Result<Response>
    where
        D: RequestDescriptor + 'static,
    {
        let handle = self.start(uri, descriptor, base_params)?;
        match join(handle).await {
            Some(result) => result,
            None => Err(NetworkError::cancelled()),
        }
    }

    /// Fetch in the background and pass the result to `on_complete`.
    ///
    /// `on_complete` runs on a runtime worker, never on the calling thread,
    /// and is dropped without being called if the request is cancelled.
    pub fn fetch_with<D, F>(
        &self,
        uri: Option<&str>,
        descriptor: D,
        base_params: Option<&Parameters>,
        on_complete: F,
    ) where
        D: RequestDescriptor + 'static,
        F: FnOnce(Result<Response>) + Send + 'static,
    {
        let started = self.start(uri, descriptor, base_params);
        tokio::spawn(async move {
            let outcome = match started {
                Ok(handle) => join(handle).await,
                Err(err) => Some(Err(err)),
            };
            match outcome {
                Some(result) => on_complete(result),
                None => trace!("request cancelled, callback dropped"),
            }
        });
    }

    /// Fetch and expose the result as a stream of at most one item.
    ///
    /// The request starts immediately; the stream only observes it. A
    /// cancelled request ends the stream without an item.
    pub fn fetch_stream<D>(
        &self,
        uri: Option<&str>,
        descriptor: D,
        base_params: Option<&Parameters>,
    ) -> impl Stream<Item = Result<Response>> + Send + 'static
    where
        D: RequestDescriptor + 'static,
    {
        let started = self.start(uri, descriptor, base_params);
        stream::once(async move {
            match started {
                Ok(handle) => join(handle).await,
                Err(err) => Some(Err(err)),
            }
        })
        .filter_map(future::ready)
    }

    /// Abort the most recently started request, if it is still running.
    pub fn cancel(&self) {
        if let Some(task) = self.task_slot().take() {
            debug!("cancelling in-flight request");
            task.abort();
        }
    }

    fn start<D>(
        &self,
        uri: Option<&str>,
        descriptor: D,
        base_params: Option<&Parameters>,
    ) -> Result<FetchHandle>
    where
        D: RequestDescriptor + 'static,
    {
        let request = self.builder.build(uri, &descriptor, base_params)?;
        let span = debug_span!(
            "fetch",
            request_id = %Uuid::new_v4(),
            method = %request.method,
            url = %request.url,
        );
        let descriptor: Arc<dyn RequestDescriptor> = Arc::new(descriptor);
        let transport = Arc::clone(&self.transport);
        let handle = tokio::spawn(perform_fetch(transport, request, descriptor).instrument(span));
        *self.task_slot() = Some(handle.abort_handle());
        Ok(handle)
    }

    fn task_slot(&self) -> MutexGuard<'_, Option<AbortHandle>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn perform_fetch<T: Transport>(
    transport: Arc<T>,
    request: HttpRequest,
    descriptor: Arc<dyn RequestDescriptor>,
) -> Result<Response> {
    let response = transport
        .execute(request)
        .await
        .map_err(|err| NetworkError::from_transport(&err))?;
    debug!(status = response.status, "received response");
    check_status(response.status)?;
    Ok(Response::new(Some(response.body), Some(descriptor)))
}

fn check_status(status: u16) -> Result<()> {
    if status == SUCCESS_STATUS {
        Ok(())
    } else {
        Err(NetworkError::RequestFailed { status })
    }
}

/// `None` when the task was aborted. Panics inside the task resume here.
async fn join(handle: FetchHandle) -> Option<Result<Response>> {
    match handle.await {
        Ok(result) => Some(result),
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(_) => None,
    }
}
