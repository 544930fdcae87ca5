//! Tests for flattening API payloads into rows.
mod common;
use chrono::NaiveDate;
use common::*;
use openweather_adapter::prelude::*;
use serde_json::json;

fn timestamp(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Cell {
    Cell::Timestamp(
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap(),
    )
}

#[test]
fn test_current_weather_row() {
    let rows = normalize(ApiMethod::CurrentWeather, &current_weather_payload()).unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];

    assert_eq!(row.len(), 31);
    assert_eq!(row.table().name, "CURRENT_WEATHER");
    assert_eq!(row.get("COUNTRY_CODE"), Some(&Cell::Text("GB".to_string())));
    assert_eq!(row.get("CITY_NAME"), Some(&Cell::Text("London".to_string())));
    assert_eq!(row.get("CITY_ID"), Some(&Cell::Integer(2643743)));
    assert_eq!(
        row.get("DATA_COLLECTION_TIME"),
        Some(&timestamp(2023, 11, 14, 22, 13, 20))
    );
    assert_eq!(row.get("LONGITUDE"), Some(&Cell::Double(-0.1257)));
    assert_eq!(row.get("WEATHER_ID"), Some(&Cell::Integer(500)));
    assert_eq!(
        row.get("WEATHER_DESCRIPTION"),
        Some(&Cell::Text("light rain".to_string()))
    );
    assert_eq!(row.get("TEMPERATURE"), Some(&Cell::Double(15.2)));
    assert_eq!(row.get("ATMOSPHERIC_PRESSURE"), Some(&Cell::Double(1012.0)));
    assert_eq!(row.get("RELATIVE_HUMIDITY"), Some(&Cell::Integer(77)));
    assert_eq!(row.get("WIND_GUST"), Some(&Cell::Double(7.2)));
    assert_eq!(row.get("RAIN_1H"), Some(&Cell::Double(0.35)));
    assert_eq!(row.get("RAIN_3H"), Some(&Cell::Null));
    assert_eq!(row.get("VISIBILITY"), Some(&Cell::Integer(10000)));
    assert_eq!(row.get("SUNRISE"), Some(&timestamp(2023, 11, 14, 7, 20, 0)));
    assert_eq!(row.get("TIMEZONE_SHIFT"), Some(&Cell::Double(0.0)));
    assert_eq!(row.get("ZIP"), Some(&Cell::Null));
}

#[test]
fn test_normalize_is_deterministic() {
    let payload = current_weather_payload();
    let first = normalize(ApiMethod::CurrentWeather, &payload).unwrap();
    let second = normalize(ApiMethod::CurrentWeather, &payload).unwrap();
    assert_eq!(first, second);
    assert_eq!(first[0].to_json().to_string(), second[0].to_json().to_string());
}

#[test]
fn test_missing_precipitation_groups_are_null() {
    let mut payload = current_weather_payload();
    let object = payload.as_object_mut().unwrap();
    object.remove("rain");
    object.remove("snow");

    let rows = normalize(ApiMethod::CurrentWeather, &payload).unwrap();
    let row = &rows[0];
    assert_eq!(row.len(), 31);
    for column in ["RAIN_1H", "RAIN_3H", "SNOW_1H", "SNOW_3H"] {
        assert!(row.get(column).unwrap().is_null(), "{} should be null", column);
    }
    assert_eq!(row.get("TEMPERATURE"), Some(&Cell::Double(15.2)));
}

#[test]
fn test_empty_payload_yields_all_null_row() {
    let rows = normalize(ApiMethod::CurrentWeather, &json!({})).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].cells().iter().all(Cell::is_null));
}

#[test]
fn test_timezone_seconds_become_hours() {
    let mut payload = current_weather_payload();
    payload["timezone"] = json!(7200);
    let rows = normalize(ApiMethod::CurrentWeather, &payload).unwrap();
    assert_eq!(rows[0].get("TIMEZONE_SHIFT").and_then(Cell::as_f64), Some(2.0));

    payload["timezone"] = json!(19800);
    let rows = normalize(ApiMethod::CurrentWeather, &payload).unwrap();
    assert_eq!(rows[0].get("TIMEZONE_SHIFT").and_then(Cell::as_f64), Some(5.5));
}

#[test]
fn test_forecast_rows() {
    let rows = normalize(ApiMethod::Forecast, &forecast_payload()).unwrap();
    assert_eq!(rows.len(), 2);

    for row in &rows {
        assert_eq!(row.len(), 29);
        assert_eq!(row.get("COUNTRY_CODE"), Some(&Cell::Text("DE".to_string())));
        assert_eq!(row.get("CITY_NAME"), Some(&Cell::Text("Berlin".to_string())));
        assert_eq!(row.get("CITY_ID"), Some(&Cell::Integer(2950159)));
        assert_eq!(row.get("LATITUDE"), Some(&Cell::Double(52.5244)));
        assert_eq!(row.get("TIMEZONE_SHIFT"), Some(&Cell::Double(1.0)));
        assert_eq!(row.get("SUNSET"), Some(&timestamp(2023, 11, 14, 15, 40, 0)));
        assert_eq!(row.get("ZIP"), Some(&Cell::Null));
    }

    assert_eq!(rows[0].get("FORECAST_TIME"), Some(&timestamp(2023, 11, 15, 0, 0, 0)));
    assert_eq!(rows[0].get("PERCIPITATION_PROBABILITY"), Some(&Cell::Double(0.2)));
    assert_eq!(rows[0].get("RAIN_3H"), Some(&Cell::Null));

    assert_eq!(rows[1].get("FORECAST_TIME"), Some(&timestamp(2023, 11, 15, 3, 0, 0)));
    assert_eq!(rows[1].get("TEMPERATURE"), Some(&Cell::Double(7.4)));
    assert_eq!(rows[1].get("RAIN_3H"), Some(&Cell::Double(0.8)));
    assert_eq!(rows[1].get("WIND_SPEED"), Some(&Cell::Null));
    assert_eq!(rows[1].get("CLOUDINESS"), Some(&Cell::Null));
}

#[test]
fn test_forecast_without_list_yields_no_rows() {
    let rows = normalize(ApiMethod::Forecast, &json!({ "cod": "200", "city": {} })).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_unparseable_forecast_time_is_null() {
    let payload = json!({ "list": [{ "dt_txt": "tomorrow" }] });
    let rows = normalize(ApiMethod::Forecast, &payload).unwrap();
    assert_eq!(rows[0].get("FORECAST_TIME"), Some(&Cell::Null));
}

#[test]
fn test_non_object_payload_is_rejected() {
    let err = normalize(ApiMethod::CurrentWeather, &json!("oops")).unwrap_err();
    assert_eq!(err, NormalizeError::NotAnObject("a string".to_string()));
}

#[test]
fn test_row_json_uses_column_names() {
    let rows = normalize(ApiMethod::CurrentWeather, &current_weather_payload()).unwrap();
    let json = rows[0].to_json();
    assert_eq!(json["CITY_NAME"], json!("London"));
    assert_eq!(json["TEMPERATURE"], json!(15.2));
    assert_eq!(json["ZIP"], serde_json::Value::Null);
    assert_eq!(json["SUNSET"], json!("2023-11-14T16:30:00"));
}
