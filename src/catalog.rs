//! Static metadata of the two virtual tables.

use crate::error::AdapterError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Declared type of a virtual table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum ColumnType {
    Varchar { size: u32 },
    Decimal { precision: u8, scale: u8 },
    Timestamp,
}

impl ColumnType {
    /// The SQL type used in the UDF's `EMITS` clause.
    pub fn emit_type(&self) -> String {
        match self {
            ColumnType::Varchar { size } => format!("VARCHAR({})", size),
            ColumnType::Decimal { scale: 0, .. } => "INT".to_string(),
            ColumnType::Decimal { .. } => "DOUBLE".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDefinition {
    pub name: &'static str,
    #[serde(rename = "dataType")]
    pub data_type: ColumnType,
    pub comment: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableDefinition {
    pub name: &'static str,
    pub columns: &'static [ColumnDefinition],
}

impl TableDefinition {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

/// The remote API method behind a virtual table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    CurrentWeather,
    Forecast,
}

impl ApiMethod {
    pub fn from_table_name(name: &str) -> Result<Self, AdapterError> {
        match name {
            "CURRENT_WEATHER" => Ok(ApiMethod::CurrentWeather),
            "FORECAST" => Ok(ApiMethod::Forecast),
            other => Err(AdapterError::UnsupportedTable(other.to_string())),
        }
    }

    /// Path segment appended to the API host.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiMethod::CurrentWeather => "weather",
            ApiMethod::Forecast => "forecast",
        }
    }

    pub fn table(&self) -> &'static TableDefinition {
        match self {
            ApiMethod::CurrentWeather => &CURRENT_WEATHER,
            ApiMethod::Forecast => &FORECAST,
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApiMethod {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weather" => Ok(ApiMethod::CurrentWeather),
            "forecast" => Ok(ApiMethod::Forecast),
            other => Err(AdapterError::UnsupportedTable(other.to_string())),
        }
    }
}

const fn varchar(name: &'static str, size: u32, comment: &'static str) -> ColumnDefinition {
    ColumnDefinition {
        name,
        data_type: ColumnType::Varchar { size },
        comment,
    }
}

const fn decimal(name: &'static str, scale: u8, comment: &'static str) -> ColumnDefinition {
    ColumnDefinition {
        name,
        data_type: ColumnType::Decimal {
            precision: 18,
            scale,
        },
        comment,
    }
}

const fn timestamp(name: &'static str, comment: &'static str) -> ColumnDefinition {
    ColumnDefinition {
        name,
        data_type: ColumnType::Timestamp,
        comment,
    }
}

const COUNTRY_CODE: ColumnDefinition = varchar("COUNTRY_CODE", 200, "Countrycode of the country");
const CITY_NAME: ColumnDefinition = varchar("CITY_NAME", 200, "The name of the city");
const CITY_ID: ColumnDefinition = decimal(
    "CITY_ID",
    0,
    "The ID of the city. Reference: https://openweathermap.org/find?q=",
);
const LONGITUDE: ColumnDefinition = decimal("LONGITUDE", 4, "The longitude of the city");
const LATITUDE: ColumnDefinition = decimal("LATITUDE", 4, "The latitude of the city");
const WEATHER_ID: ColumnDefinition = decimal(
    "WEATHER_ID",
    0,
    "The ID of the weather condition. Reference: https://openweathermap.org/weather-conditions#Weather-Condition-Codes-2",
);
const WEATHER_GROUP: ColumnDefinition =
    varchar("WEATHER_GROUP", 200, "The group name of the weather situation");
const WEATHER_DESCRIPTION: ColumnDefinition = varchar(
    "WEATHER_DESCRIPTION",
    2000,
    "The specific sub-group of weather conditions",
);
const WEATHER_ICON_ID: ColumnDefinition = varchar(
    "WEATHER_ICON_ID",
    20,
    "The weather icon ID. Reference: https://openweathermap.org/weather-conditions",
);
const TEMPERATURE: ColumnDefinition = decimal("TEMPERATURE", 2, "Temperature in degrees centigrade");
const FELT_TEMPERATURE: ColumnDefinition = decimal(
    "FELT_TEMPERATURE",
    2,
    "Temperature as humans perceive it in degrees centigrade",
);
const MIN_TEMPERATURE: ColumnDefinition = decimal(
    "MIN_TEMPERATURE",
    2,
    "Lowest currently recorded temperature in degrees centigrade",
);
const MAX_TEMPERATURE: ColumnDefinition = decimal(
    "MAX_TEMPERATURE",
    2,
    "Highest currently recorded temperature in degrees centigrade",
);
const ATMOSPHERIC_PRESSURE: ColumnDefinition = decimal(
    "ATMOSPHERIC_PRESSURE",
    2,
    "Atmospheric pressure (on the sea level, if there is no sea_level or grnd_level data) in hPa",
);
const RELATIVE_HUMIDITY: ColumnDefinition = decimal("RELATIVE_HUMIDITY", 0, "Relative humidity in %");
const PRESSURE_SEA_LEVEL: ColumnDefinition = decimal(
    "ATMOSPHERIC_PRESSURE_SEA_LEVEL",
    2,
    "Atmospheric pressure on the sea level in hPa",
);
const PRESSURE_GROUND_LEVEL: ColumnDefinition = decimal(
    "ATMOSPHERIC_PRESSURE_GROUND_LEVEL",
    2,
    "Atmospheric pressure on the ground level in hPa",
);
const WIND_SPEED: ColumnDefinition = decimal("WIND_SPEED", 2, "Wind speed in m/s");
const WIND_DIRECTION: ColumnDefinition =
    decimal("WIND_DIRECTION", 0, "Wind direction in meteorological degrees");
const WIND_GUST: ColumnDefinition = decimal("WIND_GUST", 2, "Wind gust in m/s");
const PRECIPITATION_PROBABILITY: ColumnDefinition = decimal(
    "PERCIPITATION_PROBABILITY",
    2,
    "Probability of precipitation",
);
const CLOUDINESS: ColumnDefinition = decimal("CLOUDINESS", 0, "Cloudiness in % sky coverage");
const RAIN_1H: ColumnDefinition = decimal("RAIN_1H", 2, "Rain volume for the last 1 hour in mm");
const RAIN_3H: ColumnDefinition = decimal("RAIN_3H", 2, "Rain volume for the last 3 hours in mm");
const SNOW_1H: ColumnDefinition = decimal("SNOW_1H", 2, "Snow volume for the last 1 hour in mm");
const SNOW_3H: ColumnDefinition = decimal("SNOW_3H", 2, "Snow volume for the last 3 hours in mm");
const VISIBILITY: ColumnDefinition = decimal("VISIBILITY", 0, "Visibility in m");
const SUNRISE: ColumnDefinition = timestamp("SUNRISE", "Sunrise time in UTC");
const SUNSET: ColumnDefinition = timestamp("SUNSET", "Sunset time in UTC");
const TIMEZONE_SHIFT: ColumnDefinition = decimal(
    "TIMEZONE_SHIFT",
    2,
    "Hour shift from UTC to timezone of the specific city. E.g. 2 means UTC+2",
);
const ZIP: ColumnDefinition = varchar("ZIP", 200, "Dummy column for filtering API call by ZIP code.");

pub static CURRENT_WEATHER: TableDefinition = TableDefinition {
    name: "CURRENT_WEATHER",
    columns: &[
        COUNTRY_CODE,
        CITY_NAME,
        CITY_ID,
        timestamp(
            "DATA_COLLECTION_TIME",
            "The timestamp when the weather data was collected in UTC.",
        ),
        LONGITUDE,
        LATITUDE,
        WEATHER_ID,
        WEATHER_GROUP,
        WEATHER_DESCRIPTION,
        WEATHER_ICON_ID,
        TEMPERATURE,
        FELT_TEMPERATURE,
        MIN_TEMPERATURE,
        MAX_TEMPERATURE,
        ATMOSPHERIC_PRESSURE,
        RELATIVE_HUMIDITY,
        PRESSURE_SEA_LEVEL,
        PRESSURE_GROUND_LEVEL,
        WIND_SPEED,
        WIND_DIRECTION,
        WIND_GUST,
        CLOUDINESS,
        RAIN_1H,
        RAIN_3H,
        SNOW_1H,
        SNOW_3H,
        VISIBILITY,
        SUNRISE,
        SUNSET,
        TIMEZONE_SHIFT,
        ZIP,
    ],
};

pub static FORECAST: TableDefinition = TableDefinition {
    name: "FORECAST",
    columns: &[
        COUNTRY_CODE,
        CITY_NAME,
        CITY_ID,
        timestamp("FORECAST_TIME", "The timestamp of the forecast."),
        LONGITUDE,
        LATITUDE,
        WEATHER_ID,
        WEATHER_GROUP,
        WEATHER_DESCRIPTION,
        WEATHER_ICON_ID,
        TEMPERATURE,
        FELT_TEMPERATURE,
        MIN_TEMPERATURE,
        MAX_TEMPERATURE,
        ATMOSPHERIC_PRESSURE,
        RELATIVE_HUMIDITY,
        PRESSURE_SEA_LEVEL,
        PRESSURE_GROUND_LEVEL,
        WIND_SPEED,
        WIND_DIRECTION,
        PRECIPITATION_PROBABILITY,
        CLOUDINESS,
        RAIN_3H,
        SNOW_3H,
        VISIBILITY,
        SUNRISE,
        SUNSET,
        TIMEZONE_SHIFT,
        ZIP,
    ],
};

pub fn tables() -> [&'static TableDefinition; 2] {
    [&CURRENT_WEATHER, &FORECAST]
}
