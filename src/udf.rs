//! The call-site half of the adapter.
//!
//! A pushdown does not fetch anything itself. It renders a `SELECT` of the
//! `api_handler` set-returning script with seven positional string arguments;
//! the script then rebuilds a [`UdfCall`] from those arguments and dispatches.

use crate::bundle::ParameterBundle;
use crate::catalog::ApiMethod;
use crate::config::LogSettings;
use crate::dispatch::{ApiTarget, HttpClient, RequestDispatcher};
use crate::error::{AdapterError, DiagnosticError};
use crate::normalize::OutputRow;
use itertools::Itertools;
use std::time::Duration;

pub const UDF_NAME: &str = "api_handler";

const REDACTED_KEY: &str = "<redacted>";

/// The seven arguments of one `api_handler` invocation, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdfCall {
    pub api_host: String,
    pub method: ApiMethod,
    pub filters: ParameterBundle,
    pub api_key: String,
    pub log_host: String,
    pub log_port: String,
    pub log_level: String,
}

impl UdfCall {
    /// Rebuilds a call from its positional string arguments.
    pub fn from_args(args: [&str; 7]) -> Result<Self, AdapterError> {
        let [api_host, method, filters, api_key, log_host, log_port, log_level] = args;
        Ok(Self {
            api_host: api_host.to_string(),
            method: method.parse()?,
            filters: ParameterBundle::from_wire(filters)?,
            api_key: api_key.to_string(),
            log_host: log_host.to_string(),
            log_port: log_port.to_string(),
            log_level: log_level.to_string(),
        })
    }

    pub fn target(&self) -> ApiTarget {
        ApiTarget::new(self.api_host.clone(), self.method, self.api_key.clone())
    }

    /// The same call with the API key masked, for logging.
    pub fn redacted(&self) -> Self {
        Self {
            api_key: REDACTED_KEY.to_string(),
            ..self.clone()
        }
    }

    pub fn log_settings(&self) -> Result<LogSettings, DiagnosticError> {
        LogSettings::from_parts(&self.log_host, &self.log_port, &self.log_level)
    }

    /// Renders `SELECT <schema>.api_handler(...) EMITS (...)`.
    pub fn to_sql(&self, script_schema: &str) -> Result<String, AdapterError> {
        let filters = self.filters.to_json()?;
        let arguments = [
            self.api_host.as_str(),
            self.method.as_str(),
            filters.as_str(),
            self.api_key.as_str(),
            self.log_host.as_str(),
            self.log_port.as_str(),
            self.log_level.as_str(),
        ]
        .iter()
        .map(|argument| quote(argument))
        .join(", ");

        let emits = self
            .method
            .table()
            .columns
            .iter()
            .map(|column| format!("{} {}", column.name.to_lowercase(), column.data_type.emit_type()))
            .join(", ");

        Ok(format!(
            "SELECT {}.{}({}) EMITS ({})",
            script_schema.to_lowercase(),
            UDF_NAME,
            arguments,
            emits
        ))
    }

    /// Runs every call the filters expand into and collects the rows.
    pub fn execute(&self, client: &dyn HttpClient, timeout: Duration) -> Result<Vec<OutputRow>, AdapterError> {
        let sink = self.log_settings()?.open_sink();
        let dispatcher =
            RequestDispatcher::new(client, self.target(), sink.as_ref()).with_timeout(timeout);
        Ok(dispatcher.dispatch(&self.filters).collect())
    }
}

/// SQL string literal with embedded quotes doubled.
fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
