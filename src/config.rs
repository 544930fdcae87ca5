//! Adapter properties and dispatch settings.

use crate::diagnostics::{DiagnosticSink, LogLevel, TcpLineSink, TracingSink};
use crate::dispatch::{DEFAULT_API_HOST, DEFAULT_TIMEOUT};
use crate::error::{AdapterError, DiagnosticError};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use std::time::Duration;

pub const DEFAULT_SCRIPT_SCHEMA: &str = "OPENWEATHER_VS_SCRIPTS";

/// The virtual schema properties, as found under
/// `schemaMetadataInfo.properties` of every adapter request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdapterProperties {
    #[serde(rename = "API_KEY")]
    pub api_key: String,
    #[serde(rename = "LOG_LISTENER", default)]
    pub log_listener: Option<String>,
    #[serde(rename = "LOG_LISTENER_PORT", default, deserialize_with = "port_as_text")]
    pub log_listener_port: Option<String>,
    #[serde(rename = "LOG_LEVEL", default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    LogLevel::Info.to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    Text(String),
    Number(u64),
}

fn port_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<PortValue>::deserialize(deserializer)?.map(|port| match port {
        PortValue::Text(text) => text,
        PortValue::Number(n) => n.to_string(),
    }))
}

impl AdapterProperties {
    /// Reads the properties out of a full adapter request.
    pub fn from_request(request: &JsonValue) -> Result<Self, AdapterError> {
        let properties = request
            .pointer("/schemaMetadataInfo/properties")
            .ok_or(AdapterError::MissingField("schemaMetadataInfo.properties"))?;
        Ok(serde_json::from_value(properties.clone())?)
    }

    pub fn log_settings(&self) -> Result<LogSettings, DiagnosticError> {
        LogSettings::from_parts(
            self.log_listener.as_deref().unwrap_or_default(),
            self.log_listener_port.as_deref().unwrap_or_default(),
            &self.log_level,
        )
    }
}

/// Where diagnostics go and from which level on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub listener: Option<(String, u16)>,
    pub level: LogLevel,
}

impl LogSettings {
    /// Builds the settings from their textual form. An empty host means no
    /// listener; the port is then ignored.
    pub fn from_parts(host: &str, port: &str, level: &str) -> Result<Self, DiagnosticError> {
        let level: LogLevel = level.parse()?;
        let host = host.trim();
        if host.is_empty() {
            return Ok(Self {
                listener: None,
                level,
            });
        }
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| DiagnosticError::InvalidPort(port.to_string()))?;
        Ok(Self {
            listener: Some((host.to_string(), port)),
            level,
        })
    }

    /// Opens the sink for one invocation.
    pub fn open_sink(&self) -> Box<dyn DiagnosticSink> {
        match &self.listener {
            Some((host, port)) => Box::new(TcpLineSink::new(host.clone(), *port, self.level)),
            None => Box::new(TracingSink::new(self.level)),
        }
    }

    pub fn host(&self) -> &str {
        self.listener.as_ref().map(|(host, _)| host.as_str()).unwrap_or_default()
    }

    /// The port as forwarded to the call site, empty without a listener.
    pub fn port_text(&self) -> String {
        self.listener
            .as_ref()
            .map(|(_, port)| port.to_string())
            .unwrap_or_default()
    }
}

/// Settings shared by the pushdown and the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    pub api_host: String,
    pub script_schema: String,
    pub timeout: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            script_schema: DEFAULT_SCRIPT_SCHEMA.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl DispatchSettings {
    pub fn builder() -> DispatchSettingsBuilder {
        DispatchSettingsBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct DispatchSettingsBuilder {
    settings: DispatchSettings,
}

impl DispatchSettingsBuilder {
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.settings.api_host = host.into();
        self
    }

    pub fn with_script_schema(mut self, schema: impl Into<String>) -> Self {
        self.settings.script_schema = schema.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    pub fn build(self) -> DispatchSettings {
        self.settings
    }
}
