//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the
//! openweather-adapter crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use openweather_adapter::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let request = std::fs::read_to_string("path/to/pushdown_request.json")?;
//! let response = AdapterHandler::default().handle(&request)?;
//! println!("{}", response);
//! # Ok(())
//! # }
//! ```

// Pushdown translation
pub use crate::adapter::AdapterHandler;
pub use crate::bundle::{BundleBuilder, BundleEntry, ParameterBundle};
pub use crate::evaluator::{Fragment, FragmentTree, PredicateEvaluator};
pub use crate::filter::{FilterNode, IntoFilter, Operand, parse_filter};
pub use crate::rules::{ColumnRule, ColumnRules, ValueDomain};

// Call site
pub use crate::dispatch::{
    ApiTarget, DEFAULT_API_HOST, HttpClient, HttpResponse, RemoteCall, RequestDispatcher,
    TransportFailure, UreqClient, plan_calls,
};
pub use crate::normalize::{Cell, OutputRow, normalize};
pub use crate::udf::UdfCall;

// Metadata and configuration
pub use crate::catalog::{ApiMethod, ColumnType, TableDefinition};
pub use crate::config::{AdapterProperties, DispatchSettings, LogSettings};

// Diagnostics
pub use crate::diagnostics::{DiagnosticSink, LogLevel, MemorySink, TcpLineSink, TracingSink};

// Error types
pub use crate::error::{AdapterError, CallError, DiagnosticError, FilterError, NormalizeError};

// Result type alias for convenience
pub type Result<T, E = Box<dyn std::error::Error>> = std::result::Result<T, E>;
