//! Common test utilities for building planner filters, payloads and a mock API.
use openweather_adapter::prelude::*;
use parking_lot::Mutex;
use serde_json::{Value as JsonValue, json};
use std::time::Duration;

#[allow(dead_code)]
pub const HOST: &str = "https://api.test/data/2.5/";
#[allow(dead_code)]
pub const KEY: &str = "secret";

/// `column = 'value'` as the planner serializes it.
#[allow(dead_code)]
pub fn equal(column: &str, value: &str) -> JsonValue {
    json!({
        "type": "predicate_equal",
        "left": { "type": "column", "name": column },
        "right": { "type": "literal_string", "value": value }
    })
}

/// `'value' = column`, literal on the left.
#[allow(dead_code)]
pub fn equal_reversed(column: &str, value: &str) -> JsonValue {
    json!({
        "type": "predicate_equal",
        "left": { "type": "literal_string", "value": value },
        "right": { "type": "column", "name": column }
    })
}

#[allow(dead_code)]
pub fn in_list(column: &str, values: &[&str]) -> JsonValue {
    json!({
        "type": "predicate_in_constlist",
        "expression": { "type": "column", "name": column },
        "arguments": values
            .iter()
            .map(|v| json!({ "type": "literal_exactnumeric", "value": v }))
            .collect::<Vec<_>>()
    })
}

#[allow(dead_code)]
pub fn and(expressions: Vec<JsonValue>) -> JsonValue {
    json!({ "type": "predicate_and", "expressions": expressions })
}

#[allow(dead_code)]
pub fn or(expressions: Vec<JsonValue>) -> JsonValue {
    json!({ "type": "predicate_or", "expressions": expressions })
}

/// Runs the whole translation half: parse, evaluate, bundle.
#[allow(dead_code)]
pub fn translate(filter: JsonValue, sink: &dyn DiagnosticSink) -> ParameterBundle {
    let node = parse_filter(filter).expect("filter should parse");
    let tree = PredicateEvaluator::new(sink).evaluate(&node);
    BundleBuilder::build(&tree)
}

/// A current weather payload for London.
#[allow(dead_code)]
pub fn current_weather_payload() -> JsonValue {
    json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
        "base": "stations",
        "main": {
            "temp": 15.2,
            "feels_like": 14.6,
            "temp_min": 13.9,
            "temp_max": 16.4,
            "pressure": 1012,
            "humidity": 77,
            "sea_level": 1012,
            "grnd_level": 1008
        },
        "visibility": 10000,
        "wind": { "speed": 4.63, "deg": 240, "gust": 7.2 },
        "rain": { "1h": 0.35 },
        "clouds": { "all": 75 },
        "dt": 1700000000,
        "sys": { "country": "GB", "sunrise": 1699946400, "sunset": 1699979400 },
        "timezone": 0,
        "id": 2643743,
        "name": "London",
        "cod": 200
    })
}

/// A two-step forecast payload for Berlin.
#[allow(dead_code)]
pub fn forecast_payload() -> JsonValue {
    json!({
        "cod": "200",
        "cnt": 2,
        "list": [
            {
                "dt": 1700006400,
                "main": { "temp": 8.1, "feels_like": 6.0, "temp_min": 7.5, "temp_max": 8.1,
                          "pressure": 1005, "humidity": 81, "sea_level": 1005, "grnd_level": 1000 },
                "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04n" }],
                "clouds": { "all": 75 },
                "wind": { "speed": 3.1, "deg": 200 },
                "visibility": 10000,
                "pop": 0.2,
                "dt_txt": "2023-11-15 00:00:00"
            },
            {
                "dt": 1700017200,
                "main": { "temp": 7.4 },
                "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10n" }],
                "rain": { "3h": 0.8 },
                "pop": 0.6,
                "dt_txt": "2023-11-15 03:00:00"
            }
        ],
        "city": {
            "id": 2950159,
            "name": "Berlin",
            "coord": { "lat": 52.5244, "lon": 13.4105 },
            "country": "DE",
            "timezone": 3600,
            "sunrise": 1699944000,
            "sunset": 1699976400
        }
    })
}

#[allow(dead_code)]
type Responder = Box<dyn Fn(&str) -> Result<HttpResponse, TransportFailure> + Send + Sync>;

/// An `HttpClient` that records every requested URL and answers from a closure.
#[allow(dead_code)]
pub struct MockClient {
    responder: Responder,
    requests: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockClient {
    pub fn new(
        responder: impl Fn(&str) -> Result<HttpResponse, TransportFailure> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with `200` and the given body.
    pub fn always(body: JsonValue) -> Self {
        let body = body.to_string();
        Self::new(move |_| ok(&body))
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl HttpClient for MockClient {
    fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, TransportFailure> {
        self.requests.lock().push(url.to_string());
        (self.responder)(url)
    }
}

#[allow(dead_code)]
pub fn ok(body: &str) -> Result<HttpResponse, TransportFailure> {
    Ok(HttpResponse {
        status: 200,
        body: body.to_string(),
    })
}

/// The URL the dispatcher builds for one parameter against the test host.
#[allow(dead_code)]
pub fn url(method: &str, parameter: &str) -> String {
    format!("{}{}?{}&units=metric&appid={}", HOST, method, parameter, KEY)
}

#[allow(dead_code)]
pub fn target(method: ApiMethod) -> ApiTarget {
    ApiTarget::new(HOST, method, KEY)
}

/// An adapter request of the given type with valid properties.
#[allow(dead_code)]
pub fn adapter_request(kind: &str) -> JsonValue {
    json!({
        "type": kind,
        "schemaMetadataInfo": {
            "name": "OPENWEATHER",
            "properties": {
                "API_KEY": KEY,
                "LOG_LEVEL": "INFO"
            }
        }
    })
}

/// A pushdown request against `table` with the given filter.
#[allow(dead_code)]
pub fn pushdown_request(table: &str, filter: JsonValue) -> JsonValue {
    let mut request = adapter_request("pushdown");
    request["pushdownRequest"] = json!({
        "type": "select",
        "from": { "type": "table", "name": table },
        "filter": filter
    });
    request
}
