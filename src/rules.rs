use crate::error::FilterError;
use ahash::AHashMap;
use std::sync::OnceLock;

/// The accepted value domain of a filterable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueDomain {
    /// Free text that must not look like a number.
    FreeText,
    /// Any real number.
    Real,
    /// Whole numbers only.
    Integer,
}

/// How one filterable column maps onto an API query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRule {
    pub column: &'static str,
    pub api_prefix: &'static str,
    pub domain: ValueDomain,
    pub error_code: &'static str,
}

impl ColumnRule {
    /// Validates `value` against the column's domain and formats the fragment value.
    pub fn validate(&self, value: &str) -> Result<String, FilterError> {
        let trimmed = value.trim();
        match self.domain {
            // Blank text would turn into a bare prefix such as `q=`.
            ValueDomain::FreeText => {
                if trimmed.is_empty() || trimmed.parse::<f64>().is_ok() {
                    return Err(FilterError::UnsupportedValue {
                        column: self.column.to_string(),
                        value: value.to_string(),
                    });
                }
                Ok(value.to_string())
            }
            ValueDomain::Real => match trimmed.parse::<f64>() {
                Ok(_) => Ok(trimmed.to_string()),
                Err(_) => Err(FilterError::InvalidNumeric {
                    column: self.column.to_string(),
                    value: value.to_string(),
                }),
            },
            ValueDomain::Integer => match trimmed.parse::<i64>() {
                Ok(_) => Ok(trimmed.to_string()),
                Err(_) => Err(FilterError::InvalidInteger {
                    column: self.column.to_string(),
                    value: value.to_string(),
                }),
            },
        }
    }
}

const DEFAULT_RULES: [ColumnRule; 6] = [
    ColumnRule {
        column: "CITY_NAME",
        api_prefix: "q=",
        domain: ValueDomain::FreeText,
        error_code: "E-VS-OWFS-2",
    },
    ColumnRule {
        column: "COUNTRY_CODE",
        api_prefix: ",",
        domain: ValueDomain::FreeText,
        error_code: "E-VS-OWFS-2",
    },
    ColumnRule {
        column: "LONGITUDE",
        api_prefix: "lon=",
        domain: ValueDomain::Real,
        error_code: "E-VS-OWFS-3",
    },
    ColumnRule {
        column: "LATITUDE",
        api_prefix: "lat=",
        domain: ValueDomain::Real,
        error_code: "E-VS-OWFS-3",
    },
    ColumnRule {
        column: "CITY_ID",
        api_prefix: "id=",
        domain: ValueDomain::Integer,
        error_code: "E-VS-OWFS-5",
    },
    ColumnRule {
        column: "ZIP",
        api_prefix: "zip=",
        domain: ValueDomain::Integer,
        error_code: "E-VS-OWFS-5",
    },
];

/// Read-only lookup from column name to its translation rule.
#[derive(Debug, Clone)]
pub struct ColumnRules {
    rules: AHashMap<&'static str, ColumnRule>,
}

impl ColumnRules {
    /// The process-wide rule table for the weather tables.
    pub fn standard() -> &'static ColumnRules {
        static RULES: OnceLock<ColumnRules> = OnceLock::new();
        RULES.get_or_init(|| ColumnRules::from_rules(DEFAULT_RULES))
    }

    pub fn from_rules(rules: impl IntoIterator<Item = ColumnRule>) -> Self {
        Self {
            rules: rules.into_iter().map(|rule| (rule.column, rule)).collect(),
        }
    }

    pub fn get(&self, column: &str) -> Result<&ColumnRule, FilterError> {
        self.rules
            .get(column)
            .ok_or_else(|| FilterError::UnsupportedColumn {
                column: column.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
