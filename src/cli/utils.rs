use std::io::Read;

use anyhow::Context;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::record::DataEntry;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Failure that has already been written to the terminal
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Reported(pub String);

/// Prints a failed outcome and returns the error to exit with
pub fn output_failure(output_format: &OutputFormat, message: &str, error_code: &str) -> anyhow::Error {
    match output_error(output_format, message, Some(error_code)) {
        Ok(()) => Reported(message.to_string()).into(),
        Err(e) => e,
    }
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Reports a `{success, message}` result object; a failed result is an error exit
pub fn output_op_result(output_format: &OutputFormat, result: &Value) -> anyhow::Result<()> {
    let message = result
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if result.get("success").and_then(Value::as_bool).unwrap_or(false) {
        output_success(output_format, message, None)
    } else {
        Err(output_failure(output_format, message, "OPERATION_FAILED"))
    }
}

/// Parses one entry object from stdin
pub fn read_entry_from_stdin() -> anyhow::Result<DataEntry> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read entry from stdin")?;
    parse_entry(&input)
}

pub fn parse_entry(input: &str) -> anyhow::Result<DataEntry> {
    serde_json::from_str(input).context("stdin is not a valid entry object")
}
