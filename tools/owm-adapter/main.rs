use clap::{Parser, Subcommand};
use openweather_adapter::prelude::*;
use std::fs;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Pushdown translation and fetching for the OpenWeatherMap virtual schema
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer one adapter request read from a JSON file
    Adapter {
        /// Path to the adapter request JSON
        request_path: String,
        /// Schema holding the api_handler script
        #[arg(long)]
        script_schema: Option<String>,
    },
    /// Translate a planner filter JSON file into the serialized API filters
    Translate {
        /// Path to the filter JSON
        filter_path: String,
    },
    /// Run the call site: fetch rows for serialized API filters
    Fetch {
        /// `weather` or `forecast`
        #[arg(short, long)]
        method: String,
        /// Serialized filters, e.g. '["id=2643743","id=2950159"]'
        #[arg(short, long)]
        filters: String,
        /// OpenWeatherMap API key
        #[arg(short = 'k', long, env = "OPENWEATHER_API_KEY")]
        api_key: String,
        #[arg(long, default_value = DEFAULT_API_HOST)]
        host: String,
        /// Per-call timeout in seconds
        #[arg(short, long, default_value_t = 10)]
        timeout: u64,
        /// Issue up to this many calls at once
        #[arg(short, long)]
        parallel: Option<usize>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("openweather_adapter=info,warn")),
        )
        .init();

    match Cli::parse().command {
        Command::Adapter {
            request_path,
            script_schema,
        } => run_adapter(&request_path, script_schema),
        Command::Translate { filter_path } => run_translate(&filter_path),
        Command::Fetch {
            method,
            filters,
            api_key,
            host,
            timeout,
            parallel,
        } => run_fetch(&method, &filters, &api_key, &host, timeout, parallel),
    }
}

fn run_adapter(request_path: &str, script_schema: Option<String>) {
    let request = fs::read_to_string(request_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read adapter request '{}': {}",
            request_path, e
        ))
    });

    let mut settings = DispatchSettings::builder();
    if let Some(schema) = script_schema {
        settings = settings.with_script_schema(schema);
    }
    let handler = AdapterHandler::new(settings.build());

    let response = handler
        .handle(&request)
        .unwrap_or_else(|e| exit_with_error(&format!("Adapter request failed: {}", e)));
    println!("{}", response);
}

fn run_translate(filter_path: &str) {
    let text = fs::read_to_string(filter_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read filter '{}': {}", filter_path, e))
    });
    let json: serde_json::Value = serde_json::from_str(&text)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse filter JSON: {}", e)));
    let filter = parse_filter(json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read filter tree: {}", e)));

    let sink = MemorySink::new();
    let tree = PredicateEvaluator::new(&sink).evaluate(&filter);
    let bundle = BundleBuilder::build(&tree);

    println!("Filter:  {}", filter);
    match bundle.to_json() {
        Ok(json) => println!("Bundle:  {}", json),
        Err(e) => exit_with_error(&format!("Failed to serialize bundle: {}", e)),
    }
    println!("Calls:");
    for parameter in plan_calls(&bundle) {
        println!("  -> {}", parameter);
    }

    let warnings = sink.warnings();
    if !warnings.is_empty() {
        println!("Dropped leaves:");
        for warning in warnings {
            println!("  -> {}", warning);
        }
    }
}

fn run_fetch(
    method: &str,
    filters: &str,
    api_key: &str,
    host: &str,
    timeout: u64,
    parallel: Option<usize>,
) {
    let method: ApiMethod = method
        .parse()
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid method: {}", e)));
    let bundle = ParameterBundle::from_wire(filters)
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid filters: {}", e)));

    let client = UreqClient::new();
    let sink = TracingSink::default();
    let dispatcher = RequestDispatcher::new(&client, ApiTarget::new(host, method, api_key), &sink)
        .with_timeout(Duration::from_secs(timeout));

    let start = Instant::now();
    let rows = match parallel {
        Some(max_in_flight) => dispatcher.dispatch_parallel(&bundle, max_in_flight),
        None => dispatcher.dispatch(&bundle).collect(),
    };
    for row in &rows {
        println!("{}", row.to_json());
    }
    eprintln!("{} row(s) in {:?}", rows.len(), start.elapsed());
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
