use crate::catalog::{ApiMethod, ColumnType, TableDefinition};
use crate::error::NormalizeError;
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

mod fields;

use fields::{Conversion, Field, Scope, CURRENT_WEATHER_FIELDS, FORECAST_FIELDS};

const FORECAST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single typed value of an output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Text(String),
    Integer(i64),
    Double(f64),
    Timestamp(NaiveDateTime),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Double(n) => Some(*n),
            Cell::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "NULL"),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Integer(n) => write!(f, "{}", n),
            Cell::Double(n) => write!(f, "{}", n),
            Cell::Timestamp(ts) => write!(f, "{}", ts.format(FORECAST_TIME_FORMAT)),
        }
    }
}

/// One emitted row, as wide as its table definition.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    table: &'static TableDefinition,
    cells: Vec<Cell>,
}

impl OutputRow {
    pub fn table(&self) -> &'static TableDefinition {
        self.table
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Looks a cell up by its catalog column name.
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.table
            .column_index(column)
            .and_then(|index| self.cells.get(index))
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// The row as a JSON object keyed by column name.
    pub fn to_json(&self) -> JsonValue {
        let map = self
            .table
            .columns
            .iter()
            .zip(&self.cells)
            .map(|(column, cell)| {
                let value = serde_json::to_value(cell).unwrap_or(JsonValue::Null);
                (column.name.to_string(), value)
            })
            .collect();
        JsonValue::Object(map)
    }
}

/// Flattens one API payload into rows of the method's table.
///
/// Current weather yields exactly one row, a forecast one row per element of
/// its `list`. Absent groups and fields become `NULL` cells.
pub fn normalize(method: ApiMethod, payload: &JsonValue) -> Result<Vec<OutputRow>, NormalizeError> {
    if !payload.is_object() {
        return Err(NormalizeError::NotAnObject(json_kind(payload).to_string()));
    }

    let rows = match method {
        ApiMethod::CurrentWeather => {
            vec![build_row(method.table(), &CURRENT_WEATHER_FIELDS, payload, &JsonValue::Null)]
        }
        ApiMethod::Forecast => {
            let city = payload.get("city").unwrap_or(&JsonValue::Null);
            payload
                .get("list")
                .and_then(JsonValue::as_array)
                .map(|records| {
                    records
                        .iter()
                        .map(|record| build_row(method.table(), &FORECAST_FIELDS, record, city))
                        .collect()
                })
                .unwrap_or_default()
        }
    };
    Ok(rows)
}

fn build_row(
    table: &'static TableDefinition,
    fields: &[Field],
    record: &JsonValue,
    city: &JsonValue,
) -> OutputRow {
    let cells = table
        .columns
        .iter()
        .zip(fields)
        .map(|(column, field)| {
            let scope = match field.scope {
                Scope::Record => record,
                Scope::City => city,
            };
            to_cell(column.data_type, field.conversion, scope.pointer(field.pointer))
        })
        .collect();
    OutputRow { table, cells }
}

fn to_cell(data_type: ColumnType, conversion: Conversion, raw: Option<&JsonValue>) -> Cell {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return Cell::Null;
    };

    let cell = match conversion {
        Conversion::AlwaysNull => None,
        Conversion::EpochSeconds => as_integer(raw)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|ts| Cell::Timestamp(ts.naive_utc())),
        Conversion::TextTimestamp => raw
            .as_str()
            .and_then(|text| NaiveDateTime::parse_from_str(text, FORECAST_TIME_FORMAT).ok())
            .map(Cell::Timestamp),
        Conversion::HoursFromSeconds => raw.as_f64().map(|secs| Cell::Double(secs / 3600.0)),
        Conversion::Plain => match data_type {
            ColumnType::Varchar { .. } => match raw {
                JsonValue::String(s) => Some(Cell::Text(s.clone())),
                JsonValue::Number(n) => Some(Cell::Text(n.to_string())),
                _ => None,
            },
            ColumnType::Decimal { scale: 0, .. } => as_integer(raw).map(Cell::Integer),
            ColumnType::Decimal { .. } => raw.as_f64().map(Cell::Double),
            ColumnType::Timestamp => None,
        },
    };
    cell.unwrap_or(Cell::Null)
}

fn as_integer(value: &JsonValue) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|n| n.round() as i64))
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
