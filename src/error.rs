use thiserror::Error;

/// Errors raised while translating a single filter leaf into an API parameter.
///
/// These never abort a pushdown. The evaluator records the error on the
/// diagnostic sink and drops the leaf, sibling leaves keep evaluating.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error(
        "E-VS-OWFS-1 Filtering not supported on column {column} in PREDICATE_EQUAL expression."
    )]
    UnsupportedColumn { column: String },

    #[error("E-VS-OWFS-2 {column} column filter does not accept numbers. Found <{value}>.")]
    UnsupportedValue { column: String, value: String },

    #[error("E-VS-OWFS-3 {column} column filter only accepts numbers. Found <{value}>.")]
    InvalidNumeric { column: String, value: String },

    #[error("E-VS-OWFS-5 {column} column filter only accepts whole numbers. Found <{value}>.")]
    InvalidInteger { column: String, value: String },

    #[error("Equality predicate must compare exactly one column with one literal, found {found}")]
    MalformedLeaf { found: String },

    #[error("Predicate type '{0}' cannot be translated into an API parameter")]
    UnsupportedPredicate(String),
}

impl FilterError {
    /// The legacy diagnostic code carried by the error, if any.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            FilterError::UnsupportedColumn { .. } => Some("E-VS-OWFS-1"),
            FilterError::UnsupportedValue { .. } => Some("E-VS-OWFS-2"),
            FilterError::InvalidNumeric { .. } => Some("E-VS-OWFS-3"),
            FilterError::InvalidInteger { .. } => Some("E-VS-OWFS-5"),
            FilterError::MalformedLeaf { .. } | FilterError::UnsupportedPredicate(_) => None,
        }
    }
}

/// Errors raised while setting up the diagnostic sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticError {
    #[error("E-VS-OWFS-4 Chosen LOG_LEVEL <{0}> not supported. Please choose 'INFO' or 'WARNING'")]
    UnsupportedLogLevel(String),

    #[error("Invalid log listener port '{0}'")]
    InvalidPort(String),
}

/// Errors raised by a single remote API call. Each one costs the rows of that
/// call only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("E-VW-OWFS-8 API request with parameter <{parameter}> timed out.")]
    ApiTimeout { parameter: String },

    #[error("API request with parameter <{parameter}> returned status {status}: {body}")]
    ApiNonSuccessStatus {
        parameter: String,
        status: u16,
        body: String,
    },

    #[error("API request with parameter <{parameter}> failed: {message}")]
    Transport { parameter: String, message: String },

    #[error("API response for parameter <{parameter}> is not valid JSON: {message}")]
    MalformedResponse { parameter: String, message: String },
}

/// Errors raised while flattening an API payload into rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Expected a JSON object as the API payload, found {0}")]
    NotAnObject(String),
}

/// Errors that are fatal to one adapter callback.
#[derive(Error, Debug, Clone)]
pub enum AdapterError {
    #[error("F-VS-OWFS-1 Unsupported adapter callback '{0}'")]
    UnsupportedCallbackType(String),

    #[error("Table '{0}' is not part of the virtual schema")]
    UnsupportedTable(String),

    #[error("Adapter request is missing the field '{0}'")]
    MissingField(&'static str),

    #[error("Failed to parse adapter JSON: {0}")]
    Json(String),

    #[error(transparent)]
    Diagnostic(#[from] DiagnosticError),
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Json(err.to_string())
    }
}
