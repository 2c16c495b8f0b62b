//! Shared harness: a live mock server on a random port and a ureq-backed
//! `Transport`.

use std::sync::Once;

use compute_core::{
    ClientConfig, ComputeClient, Headers, HttpMethod, HttpRequest, HttpResponse, Transport,
    TransportError,
};
use tracing_subscriber::EnvFilter;

static INIT_TEST_TRACING: Once = Once::new();

/// Set `ENABLE_TRACING=1` to see the client's logs while testing.
pub fn init_test_tracing() {
    INIT_TEST_TRACING.call_once(|| {
        if std::env::var("ENABLE_TRACING").is_ok() {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
                )
                .with_test_writer()
                .try_init();
        }
    });
}

/// Executes `HttpRequest`s with ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &Headers,
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn send(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let body = req.body.as_deref();
        let result = match req.method {
            HttpMethod::Get => with_headers(self.agent.get(&req.url), &req.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&req.url), &req.headers).call(),
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(&req.url), &req.headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = with_headers(self.agent.put(&req.url), &req.headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Patch => {
                let builder = with_headers(self.agent.patch(&req.url), &req.headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| TransportError::with_source("request failed", e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::with_source("failed to read body", e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Start the mock server on a random port and return its base address.
pub fn spawn_server() -> String {
    init_test_tracing();

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

    format!("http://{addr}")
}

/// A client for a freshly started mock server.
pub fn live_client() -> ComputeClient<UreqTransport> {
    let base = spawn_server();
    let config =
        ClientConfig::new(&format!("{base}/v2")).with_legacy_url(&format!("{base}/api/v1"));
    ComputeClient::new(config, UreqTransport::new())
}
