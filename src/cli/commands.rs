//! CLI command implementations
//!
//! Every command follows the same startup sequence:
//! 1. Configuration load
//! 2. Log level applied (flag, else config)
//! 3. Schema directory load (any failure is fatal)
//!
//! and then serves requests from stdin.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::model::Model;
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::registry::Registry;
use crate::schema::SchemaLoader;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{build_response, error_response, read_request, read_requests, write_json, write_response};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory of schema definition files (required)
    pub schema_dir: String,

    /// Minimum log severity (optional, default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.schema_dir.trim().is_empty() {
            return Err(CliError::config_error("schema_dir must not be empty"));
        }

        self.severity()?;

        Ok(())
    }

    /// Get schema directory as Path
    pub fn schema_path(&self) -> &Path {
        Path::new(&self.schema_dir)
    }

    /// Parsed log level
    pub fn severity(&self) -> CliResult<Severity> {
        parse_level(&self.log_level)
    }
}

fn parse_level(level: &str) -> CliResult<Severity> {
    level
        .parse()
        .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args())
}

/// Run the appropriate command based on CLI args
pub fn run_command(cli: Cli) -> CliResult<()> {
    let log_level = cli.log_level.as_deref();
    match cli.command {
        Command::Check { config } => check(&config, log_level),
        Command::Create { config, schema } => create(&config, &schema, log_level),
        Command::Update { config, schema } => update(&config, &schema, log_level),
        Command::Batch { config } => batch(&config, log_level),
    }
}

/// Load and compile every schema, then print a description of each
pub fn check(config_path: &Path, log_level: Option<&str>) -> CliResult<()> {
    let loader = boot(config_path, log_level)?;
    write_response(describe(&loader))
}

/// Build one instance from the JSON object on stdin
pub fn create(config_path: &Path, schema: &str, log_level: Option<&str>) -> CliResult<()> {
    let loader = boot(config_path, log_level)?;
    let model = lookup(&loader, schema)?;

    let input = read_request()?;
    let input = as_object(input, "input")?;

    write_json(&build_response(model.create(&input)))
}

/// Apply `{"existing": {..}, "changes": {..}}` from stdin
pub fn update(config_path: &Path, schema: &str, log_level: Option<&str>) -> CliResult<()> {
    let loader = boot(config_path, log_level)?;
    let model = lookup(&loader, schema)?;

    let request: UpdateRequest = serde_json::from_value(read_request()?)?;

    write_json(&build_response(model.update(&request.existing, &request.changes)))
}

/// Serve one request per stdin line, one response per stdout line
///
/// A malformed request produces an error response and processing
/// continues; a failure to read stdin ends the batch.
pub fn batch(config_path: &Path, log_level: Option<&str>) -> CliResult<()> {
    let loader = boot(config_path, log_level)?;

    log_event_with_fields(
        Event::BatchBegin,
        &[("schemas", loader.schema_count().to_string().as_str())],
    );

    let mut tally = BatchTally::default();
    for line in read_requests() {
        let line = line?;
        let response = match serde_json::from_str::<Value>(&line) {
            Ok(request) => handle_request(&loader, request),
            Err(e) => error_response(&CliError::from(e)),
        };
        tally.count(&response);
        write_json(&response)?;
    }

    log_event_with_fields(
        Event::BatchComplete,
        &[
            ("error", tally.error.to_string().as_str()),
            ("ok", tally.ok.to_string().as_str()),
            ("rejected", tally.rejected.to_string().as_str()),
        ],
    );

    Ok(())
}

/// Request body of `update`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateRequest {
    existing: Map<String, Value>,
    #[serde(default)]
    changes: Map<String, Value>,
}

/// One batch line
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum BatchRequest {
    Create {
        schema: String,
        #[serde(default)]
        input: Map<String, Value>,
    },
    Update {
        schema: String,
        existing: Map<String, Value>,
        #[serde(default)]
        changes: Map<String, Value>,
    },
}

/// Serve one batch request
pub fn handle_request(loader: &SchemaLoader, request: Value) -> Value {
    let request: BatchRequest = match serde_json::from_value(request) {
        Ok(request) => request,
        Err(e) => return error_response(&CliError::from(e)),
    };

    let result = match &request {
        BatchRequest::Create { schema, input } => {
            lookup(loader, schema).map(|model| model.create(input))
        }
        BatchRequest::Update {
            schema,
            existing,
            changes,
        } => lookup(loader, schema).map(|model| model.update(existing, changes)),
    };

    match result {
        Ok(result) => build_response(result),
        Err(e) => error_response(&e),
    }
}

/// Schema names, projections and dependency order
pub fn describe(loader: &SchemaLoader) -> Value {
    let schemas: Vec<Value> = loader
        .names()
        .filter_map(|name| loader.get(name))
        .map(|model| {
            let schema = model.schema();
            json!({
                "name": schema.name(),
                "properties": schema.projection().collect::<Vec<_>>(),
                "resolution_order": schema.resolution_order(),
            })
        })
        .collect();
    json!({ "schemas": schemas })
}

#[derive(Debug, Default)]
struct BatchTally {
    ok: usize,
    rejected: usize,
    error: usize,
}

impl BatchTally {
    fn count(&mut self, response: &Value) {
        match response["status"].as_str() {
            Some("ok") => self.ok += 1,
            Some("rejected") => self.rejected += 1,
            _ => self.error += 1,
        }
    }
}

/// Loads config, applies the log level and loads every schema.
fn boot(config_path: &Path, log_level: Option<&str>) -> CliResult<SchemaLoader> {
    let config = Config::load(config_path)?;

    let severity = match log_level {
        Some(level) => parse_level(level)?,
        None => config.severity()?,
    };
    Logger::set_min_severity(severity);

    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("log_level", severity.as_str()),
            ("schema_dir", config.schema_dir.as_str()),
        ],
    );

    let mut loader = SchemaLoader::new(config.schema_path(), Registry::with_builtins());
    loader.load_all()?;
    Ok(loader)
}

fn lookup(loader: &SchemaLoader, schema: &str) -> CliResult<Model> {
    loader
        .model(schema)
        .ok_or_else(|| CliError::unknown_schema(schema))
}

fn as_object(value: Value, what: &str) -> CliResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::io_error(format!("{} must be a JSON object", what))),
    }
}
