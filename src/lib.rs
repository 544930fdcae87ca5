//! # openweather-adapter - Filter Pushdown for the OpenWeatherMap API
//!
//! **openweather-adapter** turns the filter predicates of a SQL query against the
//! `CURRENT_WEATHER` and `FORECAST` virtual tables into OpenWeatherMap API calls, and
//! turns the JSON those calls return into typed rows.
//!
//! ## Core Workflow
//!
//! A query runs in two halves. The adapter half sees the planner's filter tree and
//! answers with SQL; the call-site half runs that SQL's script and fetches.
//!
//! 1.  **Parse**: The planner's `filter` JSON is resolved once into a [`filter::FilterNode`] through the `IntoFilter` trait.
//! 2.  **Evaluate**: A [`evaluator::PredicateEvaluator`] validates every equality leaf against the [`rules::ColumnRules`] table and translates it into an API parameter fragment such as `id=2643743`. Invalid leaves are reported on the diagnostic sink and dropped.
//! 3.  **Bundle**: The [`bundle::BundleBuilder`] shapes the fragments into a [`bundle::ParameterBundle`], the JSON value that travels inside the rendered SQL.
//! 4.  **Dispatch**: At the call site a [`dispatch::RequestDispatcher`] expands the bundle into remote calls and lazily yields the rows the [`normalize`] module extracts from each payload.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use openweather_adapter::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sink = MemorySink::new();
//!
//!     // 1. Parse the planner's filter: CITY_ID IN (2643743, 2950159)
//!     let filter = parse_filter(serde_json::json!({
//!         "type": "predicate_in_constlist",
//!         "expression": { "type": "column", "name": "CITY_ID" },
//!         "arguments": [
//!             { "type": "literal_exactnumeric", "value": "2643743" },
//!             { "type": "literal_exactnumeric", "value": "2950159" }
//!         ]
//!     }))?;
//!
//!     // 2. + 3. Evaluate and bundle.
//!     let tree = PredicateEvaluator::new(&sink).evaluate(&filter);
//!     let bundle = BundleBuilder::build(&tree);
//!     println!("Filters: {}", bundle.to_json()?);
//!
//!     // 4. Dispatch, one call per city id.
//!     let client = UreqClient::new();
//!     let target = ApiTarget::new(DEFAULT_API_HOST, ApiMethod::CurrentWeather, "my-api-key");
//!     let dispatcher = RequestDispatcher::new(&client, target, &sink);
//!     for row in dispatcher.dispatch(&bundle) {
//!         println!("{}", row.to_json());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod bundle;
pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod evaluator;
pub mod filter;
pub mod normalize;
pub mod prelude;
pub mod rules;
pub mod udf;
