/// Which part of the payload a field is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scope {
    /// The payload root for current weather, one list element for forecasts.
    Record,
    /// The forecast's `city` object, shared by every row of one call.
    City,
}

/// Conversion applied to the raw JSON value before typing it per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Conversion {
    Plain,
    /// Unix seconds to a UTC timestamp.
    EpochSeconds,
    /// `YYYY-MM-DD HH:MM:SS`, already UTC.
    TextTimestamp,
    /// Seconds to hours.
    HoursFromSeconds,
    /// The column is never populated from the payload.
    AlwaysNull,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Field {
    pub scope: Scope,
    pub pointer: &'static str,
    pub conversion: Conversion,
}

const fn record(pointer: &'static str) -> Field {
    Field {
        scope: Scope::Record,
        pointer,
        conversion: Conversion::Plain,
    }
}

const fn city(pointer: &'static str) -> Field {
    Field {
        scope: Scope::City,
        pointer,
        conversion: Conversion::Plain,
    }
}

const fn converted(field: Field, conversion: Conversion) -> Field {
    Field {
        scope: field.scope,
        pointer: field.pointer,
        conversion,
    }
}

const NULL: Field = converted(record(""), Conversion::AlwaysNull);

/// Field sources for `CURRENT_WEATHER`, in catalog column order.
pub(super) const CURRENT_WEATHER_FIELDS: [Field; 31] = [
    record("/sys/country"),
    record("/name"),
    record("/id"),
    converted(record("/dt"), Conversion::EpochSeconds),
    record("/coord/lon"),
    record("/coord/lat"),
    record("/weather/0/id"),
    record("/weather/0/main"),
    record("/weather/0/description"),
    record("/weather/0/icon"),
    record("/main/temp"),
    record("/main/feels_like"),
    record("/main/temp_min"),
    record("/main/temp_max"),
    record("/main/pressure"),
    record("/main/humidity"),
    record("/main/sea_level"),
    record("/main/grnd_level"),
    record("/wind/speed"),
    record("/wind/deg"),
    record("/wind/gust"),
    record("/clouds/all"),
    record("/rain/1h"),
    record("/rain/3h"),
    record("/snow/1h"),
    record("/snow/3h"),
    record("/visibility"),
    converted(record("/sys/sunrise"), Conversion::EpochSeconds),
    converted(record("/sys/sunset"), Conversion::EpochSeconds),
    converted(record("/timezone"), Conversion::HoursFromSeconds),
    NULL,
];

/// Field sources for `FORECAST`, in catalog column order.
pub(super) const FORECAST_FIELDS: [Field; 29] = [
    city("/country"),
    city("/name"),
    city("/id"),
    converted(record("/dt_txt"), Conversion::TextTimestamp),
    city("/coord/lon"),
    city("/coord/lat"),
    record("/weather/0/id"),
    record("/weather/0/main"),
    record("/weather/0/description"),
    record("/weather/0/icon"),
    record("/main/temp"),
    record("/main/feels_like"),
    record("/main/temp_min"),
    record("/main/temp_max"),
    record("/main/pressure"),
    record("/main/humidity"),
    record("/main/sea_level"),
    record("/main/grnd_level"),
    record("/wind/speed"),
    record("/wind/deg"),
    record("/pop"),
    record("/clouds/all"),
    record("/rain/3h"),
    record("/snow/3h"),
    record("/visibility"),
    converted(city("/sunrise"), Conversion::EpochSeconds),
    converted(city("/sunset"), Conversion::EpochSeconds),
    converted(city("/timezone"), Conversion::HoursFromSeconds),
    NULL,
];
