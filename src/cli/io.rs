//! JSON I/O handling for CLI
//!
//! - Input: JSON via stdin, one request per line for batch
//! - Output: one JSON object per line via stdout
//! - UTF-8 only

use std::io::{self, BufRead, Read, Write};

use serde_json::{json, Value};

use crate::engine::BuildResult;

use super::errors::{CliError, CliResult};

/// Read a single JSON request from stdin
///
/// The whole of stdin is one document, so pretty-printed input works.
pub fn read_request() -> CliResult<Value> {
    let mut content = String::new();
    io::stdin().lock().read_to_string(&mut content)?;

    if content.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    let value: Value = serde_json::from_str(&content)?;
    Ok(value)
}

/// Read request lines from stdin, skipping blank lines
pub fn read_requests() -> impl Iterator<Item = CliResult<String>> {
    io::stdin()
        .lock()
        .lines()
        .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
        .map(|line| line.map_err(CliError::from))
}

/// Response object for a build result
pub fn build_response(result: BuildResult) -> Value {
    match result.into_result() {
        Ok(data) => json!({"status": "ok", "data": data}),
        Err(errors) => json!({"status": "rejected", "errors": errors}),
    }
}

/// Response object for a request that could not be served
pub fn error_response(error: &CliError) -> Value {
    json!({
        "status": "error",
        "code": error.code_str(),
        "message": error.message()
    })
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_json(&json!({"status": "ok", "data": data}))
}

/// Write one JSON value as a line to stdout
pub fn write_json(value: &Value) -> CliResult<()> {
    let stdout = io::stdout();
    write_line(&mut stdout.lock(), value)
}

fn write_line<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
