//! Unit tests for diagnostics, configuration, rules and catalog metadata.
mod common;
use openweather_adapter::catalog::{self, CURRENT_WEATHER, FORECAST};
use openweather_adapter::prelude::*;
use serde_json::json;
use std::io::{BufRead, BufReader, Read};
use std::net::TcpListener;
use std::time::{Duration, Instant};

#[test]
fn test_log_level_parsing() {
    assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
    assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
    assert_eq!("20".parse::<LogLevel>().unwrap(), LogLevel::Info);
    assert_eq!("30".parse::<LogLevel>().unwrap(), LogLevel::Warning);

    let err = "DEBUG".parse::<LogLevel>().unwrap_err();
    assert_eq!(err, DiagnosticError::UnsupportedLogLevel("DEBUG".to_string()));
    assert!(err.to_string().starts_with("E-VS-OWFS-4"));
}

#[test]
fn test_log_level_ordering_and_numbers() {
    assert!(LogLevel::Info < LogLevel::Warning);
    assert_eq!(LogLevel::Info.as_number(), 20);
    assert_eq!(LogLevel::Warning.as_number(), 30);
    assert_eq!(LogLevel::Warning.to_string(), "WARNING");
}

#[test]
fn test_filter_error_codes() {
    let cases = [
        (
            FilterError::UnsupportedColumn {
                column: "X".to_string(),
            },
            Some("E-VS-OWFS-1"),
        ),
        (
            FilterError::UnsupportedValue {
                column: "CITY_NAME".to_string(),
                value: "1".to_string(),
            },
            Some("E-VS-OWFS-2"),
        ),
        (
            FilterError::InvalidNumeric {
                column: "LATITUDE".to_string(),
                value: "x".to_string(),
            },
            Some("E-VS-OWFS-3"),
        ),
        (
            FilterError::InvalidInteger {
                column: "ZIP".to_string(),
                value: "x".to_string(),
            },
            Some("E-VS-OWFS-5"),
        ),
        (FilterError::UnsupportedPredicate("predicate_like".to_string()), None),
    ];
    for (err, code) in cases {
        assert_eq!(err.code(), code);
        if let Some(code) = code {
            assert!(err.to_string().starts_with(code));
        }
    }
}

#[test]
fn test_rule_codes_match_their_errors() {
    let rules = ColumnRules::standard();
    assert_eq!(rules.len(), 6);
    for column in ["CITY_NAME", "COUNTRY_CODE", "LONGITUDE", "LATITUDE", "CITY_ID", "ZIP"] {
        let rule = rules.get(column).unwrap();
        let bad_value = match rule.domain {
            ValueDomain::FreeText => "12",
            ValueDomain::Real | ValueDomain::Integer => "abc",
        };
        let err = rule.validate(bad_value).unwrap_err();
        assert_eq!(err.code(), Some(rule.error_code));
    }
    assert!(rules.get("SUNRISE").is_err());
}

#[test]
fn test_rule_values_are_trimmed_for_numbers_only() {
    let rules = ColumnRules::standard();
    assert_eq!(rules.get("LATITUDE").unwrap().validate(" 52.5 ").unwrap(), "52.5");
    assert_eq!(rules.get("ZIP").unwrap().validate("10115 ").unwrap(), "10115");
    assert_eq!(
        rules.get("CITY_NAME").unwrap().validate("New York").unwrap(),
        "New York"
    );
}

#[test]
fn test_blank_free_text_is_rejected() {
    let rules = ColumnRules::standard();
    for column in ["CITY_NAME", "COUNTRY_CODE"] {
        let err = rules.get(column).unwrap().validate("  ").unwrap_err();
        assert_eq!(err.code(), Some("E-VS-OWFS-2"));
    }
    assert!(rules.get("CITY_NAME").unwrap().validate("").is_err());
}

#[test]
fn test_memory_sink_records_levels() {
    let sink = MemorySink::new();
    sink.info("one");
    sink.warn("two");
    assert_eq!(
        sink.records(),
        vec![
            (LogLevel::Info, "one".to_string()),
            (LogLevel::Warning, "two".to_string())
        ]
    );
    assert_eq!(sink.warnings(), vec!["two".to_string()]);
}

#[test]
fn test_tcp_sink_writes_lines_above_level() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let sink = TcpLineSink::new("127.0.0.1", port, LogLevel::Warning)
        .with_timeout(Duration::from_secs(1));
    sink.info("not sent");
    sink.warn("E-VW-OWFS-8 API request with parameter <id=1> timed out.");
    sink.warn("second");
    drop(sink);

    let (stream, _) = listener.accept().unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let mut reader = BufReader::new(stream);

    let mut first = Vec::new();
    reader.read_until(b'\n', &mut first).unwrap();
    assert!(first.ends_with(b": E-VW-OWFS-8 API request with parameter <id=1> timed out.\r\n"));

    let mut second = Vec::new();
    reader.read_until(b'\n', &mut second).unwrap();
    assert!(second.ends_with(b": second\r\n"));

    let mut rest = Vec::new();
    reader.read_to_end(&mut rest).unwrap();
    assert!(rest.is_empty());
    for line in [&first, &second] {
        assert!(!String::from_utf8_lossy(line).contains("not sent"));
    }
}

#[test]
fn test_tcp_sink_does_not_block_on_stalled_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let sink = TcpLineSink::new("127.0.0.1", port, LogLevel::Info)
        .with_timeout(Duration::from_millis(200));
    let record = "x".repeat(1 << 20);

    let start = Instant::now();
    for _ in 0..64 {
        sink.info(&record);
    }
    assert!(
        start.elapsed() < Duration::from_secs(5),
        "sink blocked for {:?}",
        start.elapsed()
    );

    // The peer holds the connection open and never reads from it.
    let (_stalled, _) = listener.accept().unwrap();
}

#[test]
fn test_tcp_sink_survives_missing_listener() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let sink = TcpLineSink::new("127.0.0.1", port, LogLevel::Info)
        .with_timeout(Duration::from_millis(200));
    sink.info("goes nowhere");
    sink.warn("still fine");
    assert_eq!(sink.port(), port);
    assert_eq!(sink.min_level(), LogLevel::Info);
}

#[test]
fn test_adapter_properties() {
    let request = json!({
        "schemaMetadataInfo": {
            "properties": {
                "API_KEY": "abc",
                "LOG_LISTENER": "127.0.0.1",
                "LOG_LISTENER_PORT": "3000",
                "LOG_LEVEL": "WARNING"
            }
        }
    });
    let properties = AdapterProperties::from_request(&request).unwrap();
    assert_eq!(properties.api_key, "abc");
    assert_eq!(properties.log_listener_port.as_deref(), Some("3000"));

    let log = properties.log_settings().unwrap();
    assert_eq!(log.listener, Some(("127.0.0.1".to_string(), 3000)));
    assert_eq!(log.level, LogLevel::Warning);
    assert_eq!(log.host(), "127.0.0.1");
    assert_eq!(log.port_text(), "3000");
}

#[test]
fn test_adapter_property_defaults() {
    let request = json!({ "schemaMetadataInfo": { "properties": { "API_KEY": "abc" } } });
    let properties = AdapterProperties::from_request(&request).unwrap();
    assert_eq!(properties.log_level, "INFO");

    let log = properties.log_settings().unwrap();
    assert_eq!(log.listener, None);
    assert_eq!(log.host(), "");
    assert_eq!(log.port_text(), "");
}

#[test]
fn test_api_key_is_required() {
    let request = json!({ "schemaMetadataInfo": { "properties": { "LOG_LEVEL": "INFO" } } });
    assert!(matches!(
        AdapterProperties::from_request(&request),
        Err(AdapterError::Json(_))
    ));
}

#[test]
fn test_log_settings_from_parts() {
    let log = LogSettings::from_parts("logs.local", "514", "30").unwrap();
    assert_eq!(log.listener, Some(("logs.local".to_string(), 514)));
    assert_eq!(log.level, LogLevel::Warning);

    assert_eq!(
        LogSettings::from_parts("logs.local", "port", "INFO").unwrap_err(),
        DiagnosticError::InvalidPort("port".to_string())
    );
    assert!(LogSettings::from_parts("", "", "INFO").unwrap().listener.is_none());
}

#[test]
fn test_dispatch_settings_defaults() {
    let settings = DispatchSettings::default();
    assert_eq!(settings.api_host, DEFAULT_API_HOST);
    assert_eq!(settings.script_schema, "OPENWEATHER_VS_SCRIPTS");
    assert_eq!(settings.timeout, Duration::from_secs(10));
    assert_eq!(DispatchSettings::builder().build(), settings);
}

#[test]
fn test_catalog_shapes() {
    assert_eq!(CURRENT_WEATHER.width(), 31);
    assert_eq!(FORECAST.width(), 29);
    assert_eq!(catalog::tables().map(|t| t.name), ["CURRENT_WEATHER", "FORECAST"]);

    for table in catalog::tables() {
        assert_eq!(table.columns.last().map(|c| c.name), Some("ZIP"));
        assert_eq!(table.column_index("COUNTRY_CODE"), Some(0));
    }
    assert_eq!(FORECAST.column_index("FORECAST_TIME"), Some(3));
    assert_eq!(CURRENT_WEATHER.column_index("PERCIPITATION_PROBABILITY"), None);
}

#[test]
fn test_emit_types() {
    assert_eq!(ColumnType::Varchar { size: 20 }.emit_type(), "VARCHAR(20)");
    assert_eq!(
        ColumnType::Decimal {
            precision: 18,
            scale: 0
        }
        .emit_type(),
        "INT"
    );
    assert_eq!(
        ColumnType::Decimal {
            precision: 18,
            scale: 4
        }
        .emit_type(),
        "DOUBLE"
    );
    assert_eq!(ColumnType::Timestamp.emit_type(), "TIMESTAMP");
}

#[test]
fn test_method_mapping() {
    assert_eq!(
        ApiMethod::from_table_name("CURRENT_WEATHER").unwrap(),
        ApiMethod::CurrentWeather
    );
    assert_eq!(ApiMethod::from_table_name("FORECAST").unwrap(), ApiMethod::Forecast);
    assert!(ApiMethod::from_table_name("weather").is_err());
    assert_eq!("forecast".parse::<ApiMethod>().unwrap(), ApiMethod::Forecast);
    assert_eq!(ApiMethod::CurrentWeather.to_string(), "weather");
    assert_eq!(ApiMethod::Forecast.table().name, "FORECAST");
}
