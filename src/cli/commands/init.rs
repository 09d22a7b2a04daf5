use serde_json::{json, Value};

use crate::cli::client::ApiClient;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

/// Runs bootstrap on the server and prints the workbook identifier
pub async fn handle(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let response = client.initialize().await?;
    let spreadsheet_id = response["data"]["spreadsheetId"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("server did not return a spreadsheet id"))?;

    output_success(
        &output_format,
        &format!("Spreadsheet ready: {}", spreadsheet_id),
        Some(json!({ "spreadsheetId": spreadsheet_id })),
    )
}

pub async fn ping(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let response = client.health().await?;
    let spreadsheet = match &response["data"]["spreadsheetId"] {
        Value::String(id) => id.clone(),
        _ => "not configured".to_string(),
    };

    output_success(
        &output_format,
        &format!("{} is up (spreadsheet: {})", client.base_url(), spreadsheet),
        response.get("data").cloned(),
    )
}
