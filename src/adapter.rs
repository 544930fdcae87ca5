//! Adapter callback envelope.
//!
//! Every request is one JSON object with a `type`. All callbacks except
//! `pushdown` answer with static metadata; a pushdown translates the filter
//! into a parameter bundle and answers with the SQL that runs the call site.

use crate::bundle::{BundleBuilder, ParameterBundle};
use crate::catalog::{self, ApiMethod};
use crate::config::{AdapterProperties, DispatchSettings, LogSettings};
use crate::diagnostics::DiagnosticSink;
use crate::error::AdapterError;
use crate::evaluator::PredicateEvaluator;
use crate::filter::parse_filter;
use crate::udf::UdfCall;
use serde_json::{Value as JsonValue, json};

pub const CAPABILITIES: [&str; 8] = [
    "FILTER_EXPRESSIONS",
    "LITERAL_STRING",
    "LITERAL_DOUBLE",
    "LITERAL_EXACTNUMERIC",
    "FN_PRED_OR",
    "FN_PRED_AND",
    "FN_PRED_EQUAL",
    "FN_PRED_IN_CONSTLIST",
];

/// Answers adapter callbacks.
#[derive(Debug, Clone, Default)]
pub struct AdapterHandler {
    settings: DispatchSettings,
}

impl AdapterHandler {
    pub fn new(settings: DispatchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Handles one serialized request and returns the serialized response.
    pub fn handle(&self, request: &str) -> Result<String, AdapterError> {
        let request: JsonValue = serde_json::from_str(request)?;
        let kind = request
            .get("type")
            .and_then(JsonValue::as_str)
            .ok_or(AdapterError::MissingField("type"))?;

        let properties = AdapterProperties::from_request(&request)?;
        let log = properties.log_settings()?;

        let response = match kind {
            "createVirtualSchema" => json!({
                "type": kind,
                "schemaMetadata": { "tables": catalog::tables() },
            }),
            "dropVirtualSchema" | "refresh" | "setProperties" => json!({ "type": kind }),
            "getCapabilities" => json!({ "type": kind, "capabilities": CAPABILITIES }),
            "pushdown" => {
                let sink = log.open_sink();
                let sql = self.pushdown_sql(&request, &properties, &log, sink.as_ref())?;
                json!({ "type": kind, "sql": sql })
            }
            other => return Err(AdapterError::UnsupportedCallbackType(other.to_string())),
        };
        Ok(response.to_string())
    }

    /// Builds the call-site SQL for one pushdown request.
    pub fn pushdown_sql(
        &self,
        request: &JsonValue,
        properties: &AdapterProperties,
        log: &LogSettings,
        sink: &dyn DiagnosticSink,
    ) -> Result<String, AdapterError> {
        // `from` and `filter` may also sit on the request itself.
        let pushdown = request.get("pushdownRequest").unwrap_or(request);
        let table = pushdown
            .pointer("/from/name")
            .and_then(JsonValue::as_str)
            .ok_or(AdapterError::MissingField("pushdownRequest.from.name"))?;
        let method = ApiMethod::from_table_name(table)?;
        sink.info(&format!("Pushdown on table {} via '{}'", table, method));

        let filters = self.translate(pushdown.get("filter"), sink)?;

        let call = UdfCall {
            api_host: self.settings.api_host.clone(),
            method,
            filters,
            api_key: properties.api_key.clone(),
            log_host: log.host().to_string(),
            log_port: log.port_text(),
            log_level: log.level.as_number().to_string(),
        };
        let sql = call.to_sql(&self.settings.script_schema)?;
        sink.info(&format!(
            "Adapter SQL: {}",
            call.redacted().to_sql(&self.settings.script_schema)?
        ));
        Ok(sql)
    }

    /// Filter JSON to bundle. A missing filter fetches nothing.
    pub fn translate(
        &self,
        filter: Option<&JsonValue>,
        sink: &dyn DiagnosticSink,
    ) -> Result<ParameterBundle, AdapterError> {
        let Some(filter) = filter.filter(|f| !f.is_null()) else {
            sink.warn("Pushdown request carries no filter, no API calls will be issued");
            return Ok(ParameterBundle::empty());
        };

        let node = parse_filter(filter.clone())?;
        sink.info(&format!("Filter: {}", node));
        let tree = PredicateEvaluator::new(sink).evaluate(&node);
        let bundle = BundleBuilder::build(&tree);
        sink.info(&format!("API filters {}", bundle.to_json()?));
        Ok(bundle)
    }
}
