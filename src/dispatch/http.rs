use std::io;
use std::time::Duration;

/// Status and body of a completed GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Why a GET request produced no response at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Other(String),
}

/// The HTTP seam of the dispatcher. Non-success statuses are responses, not
/// failures.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportFailure>;
}

/// Blocking client backed by `ureq`.
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportFailure> {
        match self.agent.get(url).timeout(timeout).call() {
            Ok(response) => read_response(response),
            Err(ureq::Error::Status(_, response)) => read_response(response),
            Err(ureq::Error::Transport(transport)) => {
                if is_timeout(&transport) {
                    Err(TransportFailure::Timeout)
                } else {
                    Err(TransportFailure::Other(transport.to_string()))
                }
            }
        }
    }
}

fn read_response(response: ureq::Response) -> Result<HttpResponse, TransportFailure> {
    let status = response.status();
    match response.into_string() {
        Ok(body) => Ok(HttpResponse { status, body }),
        Err(e) if is_timeout_kind(e.kind()) => Err(TransportFailure::Timeout),
        Err(e) => Err(TransportFailure::Other(e.to_string())),
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<io::Error>())
        .is_some_and(|e| is_timeout_kind(e.kind()))
}

fn is_timeout_kind(kind: io::ErrorKind) -> bool {
    matches!(kind, io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}
