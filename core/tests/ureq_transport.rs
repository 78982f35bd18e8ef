//! Plugs a blocking ureq client in as the transport.
//!
//! # Design
//! ureq is synchronous, so each request runs on tokio's blocking pool. Status
//! codes are returned as data (`http_status_as_error(false)`) so the
//! dispatcher, not the client, decides what counts as a failure.

use bytes::Bytes;
use dispatch_core::{
    Dispatcher, Endpoint, Environment, HttpMethod, HttpRequest, HttpResponse, NetworkError, Scheme, Transport,
    TransportError,
};
use mock_server::Echo;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
enum UreqFailure {
    #[error(transparent)]
    Ureq(#[from] ureq::Error),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl TransportError for UreqFailure {
    fn code(&self) -> i32 {
        match self {
            UreqFailure::Ureq(ureq::Error::StatusCode(status)) => i32::from(*status),
            UreqFailure::Ureq(ureq::Error::Io(err)) => err.raw_os_error().unwrap_or(500),
            _ => 500,
        }
    }
}

#[derive(Debug, Clone)]
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    type Error = UreqFailure;

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, UreqFailure> {
        let agent = self.agent.clone();
        let response = tokio::task::spawn_blocking(move || execute(&agent, request)).await??;
        Ok(response)
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Execute an `HttpRequest` with ureq. DELETE bodies are not sent.
fn execute(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, ureq::Error> {
    let url = req.url.as_str();
    let headers = &req.headers;

    let mut response = match (req.method, req.body.as_deref()) {
        (HttpMethod::Get, _) => with_headers(agent.get(url), headers).call(),
        (HttpMethod::Delete, _) => with_headers(agent.delete(url), headers).call(),
        (HttpMethod::Post, Some(body)) => with_headers(agent.post(url), headers).send(body),
        (HttpMethod::Post, None) => with_headers(agent.post(url), headers).send_empty(),
        (HttpMethod::Put, Some(body)) => with_headers(agent.put(url), headers).send(body),
        (HttpMethod::Put, None) => with_headers(agent.put(url), headers).send_empty(),
        (HttpMethod::Patch, Some(body)) => with_headers(agent.patch(url), headers).send(body),
        (HttpMethod::Patch, None) => with_headers(agent.patch(url), headers).send_empty(),
    }?;

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string()?;

    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body: Bytes::from(body),
    })
}

fn start_server() -> Environment {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    Environment::new(Scheme::Http, "127.0.0.1", format!(":{}", addr.port()))
}

#[tokio::test]
async fn ureq_transport_round_trip() {
    let dispatcher = Dispatcher::with_transport(start_server(), UreqTransport::new());

    let echo: Echo = dispatcher
        .fetch(None, Endpoint::get("/echo").with_query("via", "ureq"), None)
        .await
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!(echo.query.as_deref(), Some("via=ureq"));

    let echo: Echo = dispatcher
        .fetch(None, Endpoint::put("/echo").with_body("done", true), None)
        .await
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.body, Some(json!({"done": true})));
}

#[tokio::test]
async fn ureq_transport_status_is_left_to_dispatcher() {
    let dispatcher = Dispatcher::with_transport(start_server(), UreqTransport::new());
    let err = dispatcher
        .fetch(None, Endpoint::get("/status/418"), None)
        .await
        .unwrap_err();
    assert_eq!(err, NetworkError::RequestFailed { status: 418 });
}
