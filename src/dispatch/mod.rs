use crate::bundle::ParameterBundle;
use crate::catalog::ApiMethod;
use crate::diagnostics::DiagnosticSink;
use crate::error::CallError;
use crate::normalize::{OutputRow, normalize};
use rayon::prelude::*;
use std::time::Duration;

mod classify;
pub mod http;

pub use classify::plan_calls;
pub use http::{HttpClient, HttpResponse, TransportFailure, UreqClient};

pub const DEFAULT_API_HOST: &str = "https://api.openweathermap.org/data/2.5/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the remote calls go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTarget {
    pub host: String,
    pub method: ApiMethod,
    pub api_key: String,
}

impl ApiTarget {
    pub fn new(host: impl Into<String>, method: ApiMethod, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            method,
            api_key: api_key.into(),
        }
    }
}

/// One GET request against the weather API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCall {
    pub parameter: String,
    pub url: String,
    pub timeout: Duration,
}

impl RemoteCall {
    pub fn new(target: &ApiTarget, parameter: String, timeout: Duration) -> Self {
        let url = format!(
            "{}{}?{}&units=metric&appid={}",
            target.host, target.method, parameter, target.api_key
        );
        Self {
            parameter,
            url,
            timeout,
        }
    }
}

/// Turns a parameter bundle into remote calls and the rows they return.
///
/// A failed call (timeout, non-200 status, unreadable payload) is reported on
/// the sink and contributes no rows; remaining calls still run.
pub struct RequestDispatcher<'a> {
    client: &'a dyn HttpClient,
    target: ApiTarget,
    timeout: Duration,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> RequestDispatcher<'a> {
    pub fn new(client: &'a dyn HttpClient, target: ApiTarget, sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            client,
            target,
            timeout: DEFAULT_TIMEOUT,
            sink,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn target(&self) -> &ApiTarget {
        &self.target
    }

    /// The calls a bundle expands into, in issue order.
    pub fn plan(&self, bundle: &ParameterBundle) -> Vec<RemoteCall> {
        plan_calls(bundle)
            .into_iter()
            .map(|parameter| RemoteCall::new(&self.target, parameter, self.timeout))
            .collect()
    }

    /// Lazily issues one call per planned parameter as rows are consumed.
    /// Dropping the iterator abandons the calls not yet made.
    pub fn dispatch<'s>(
        &'s self,
        bundle: &ParameterBundle,
    ) -> impl Iterator<Item = OutputRow> + use<'s, 'a> {
        let calls = self.plan(bundle);
        self.sink
            .info(&format!("Dispatching {} API call(s) to '{}'", calls.len(), self.target.method));
        calls.into_iter().flat_map(move |call| self.execute(&call))
    }

    /// Issues the planned calls with at most `max_in_flight` running at once.
    /// Rows keep the order of the planned calls.
    pub fn dispatch_parallel(&self, bundle: &ParameterBundle, max_in_flight: usize) -> Vec<OutputRow> {
        let calls = self.plan(bundle);
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(max_in_flight.max(1))
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                tracing::debug!(error = %e, "falling back to sequential dispatch");
                return calls.iter().flat_map(|call| self.execute(call)).collect();
            }
        };

        let per_call: Vec<Vec<OutputRow>> =
            pool.install(|| calls.par_iter().map(|call| self.execute(call)).collect());
        per_call.into_iter().flatten().collect()
    }

    fn execute(&self, call: &RemoteCall) -> Vec<OutputRow> {
        match self.fetch(call) {
            Ok(rows) => rows,
            Err(err) => {
                self.sink.warn(&err.to_string());
                Vec::new()
            }
        }
    }

    fn fetch(&self, call: &RemoteCall) -> Result<Vec<OutputRow>, CallError> {
        self.sink
            .info(&format!("Requesting API with: {}", call.parameter));

        let response = self
            .client
            .get(&call.url, call.timeout)
            .map_err(|failure| match failure {
                TransportFailure::Timeout => CallError::ApiTimeout {
                    parameter: call.parameter.clone(),
                },
                TransportFailure::Other(message) => CallError::Transport {
                    parameter: call.parameter.clone(),
                    message,
                },
            })?;

        if response.status != 200 {
            return Err(CallError::ApiNonSuccessStatus {
                parameter: call.parameter.clone(),
                status: response.status,
                body: response.body,
            });
        }

        let payload: serde_json::Value =
            serde_json::from_str(&response.body).map_err(|e| CallError::MalformedResponse {
                parameter: call.parameter.clone(),
                message: e.to_string(),
            })?;

        normalize(self.target.method, &payload).map_err(|e| CallError::MalformedResponse {
            parameter: call.parameter.clone(),
            message: e.to_string(),
        })
    }
}
