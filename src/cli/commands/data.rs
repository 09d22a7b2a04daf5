use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_empty_collection, output_op_result, read_entry_from_stdin};
use crate::cli::OutputFormat;
use crate::handlers::protected::data::DataQuery;

#[derive(Subcommand)]
pub enum DataCommands {
    #[command(about = "List rows matching the given filters")]
    List {
        #[arg(long, help = "Mandal name")]
        mandal: Option<String>,
        #[arg(long, help = "Secretariat name")]
        secretariat: Option<String>,
        #[arg(long, help = "Employee ID")]
        employee_id: Option<String>,
        #[arg(long, help = "Employee name")]
        employee_name: Option<String>,
        #[arg(long, help = "Cluster ID")]
        cluster: Option<String>,
        #[arg(long, help = "1-based page number")]
        page: Option<i64>,
        #[arg(long, help = "Rows per page")]
        page_size: Option<i64>,
    },

    #[command(about = "Append an entry read as JSON from stdin")]
    Create,

    #[command(about = "Overwrite a row with an entry read as JSON from stdin")]
    Update {
        #[arg(help = "1-based row number (row 1 is the header)")]
        row: usize,
    },

    #[command(about = "Delete a row")]
    Delete {
        #[arg(help = "1-based row number (row 1 is the header)")]
        row: usize,
    },
}

pub async fn handle(client: &ApiClient, cmd: DataCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DataCommands::List {
            mandal,
            secretariat,
            employee_id,
            employee_name,
            cluster,
            page,
            page_size,
        } => {
            let query = DataQuery {
                mandal_name: mandal,
                secretariat_name: secretariat,
                employee_id,
                employee_name,
                cluster_id: cluster,
                page,
                page_size,
            };
            list(client, &query, output_format).await
        }
        DataCommands::Create => {
            let entry = read_entry_from_stdin()?;
            let result = client.create(&entry).await?;
            output_op_result(&output_format, &result)
        }
        DataCommands::Update { row } => {
            let entry = read_entry_from_stdin()?;
            let result = client.update_row(row, &entry).await?;
            output_op_result(&output_format, &result)
        }
        DataCommands::Delete { row } => {
            let result = client.delete_row(row).await?;
            output_op_result(&output_format, &result)
        }
    }
}

async fn list(client: &ApiClient, query: &DataQuery, output_format: OutputFormat) -> anyhow::Result<()> {
    let response = client.list(query).await?;
    let rows = response["data"].as_array().cloned().unwrap_or_default();

    if rows.is_empty() {
        return output_empty_collection(&output_format, "data", "No rows found");
    }

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Text => {
            println!(
                "{:<5} {:<10} {:<20} {:<12} {:<16} {:>6}  {}",
                "ROW", "EMPLOYEE", "NAME", "MANDAL", "SECRETARIAT", "TOTAL", "ID"
            );
            for row in &rows {
                println!(
                    "{:<5} {:<10} {:<20} {:<12} {:<16} {:>6}  {}",
                    row["rowNumber"],
                    text(&row["employeeID"]),
                    text(&row["employeeName"]),
                    text(&row["mandalName"]),
                    text(&row["secretraiatName"]),
                    row["totalBangaruKutumbam"],
                    text(&row["id"]),
                );
            }
            if let (Some(current), Some(total)) = (response["currentPage"].as_u64(), response["totalPages"].as_u64()) {
                println!("Page {} of {} ({} rows)", current, total, response["totalRows"]);
            }
        }
    }
    Ok(())
}

/// Lists distinct filter values
pub async fn options(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let response = client.options().await?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Text => {
            for (label, key) in [
                ("Mandals", "mandalNames"),
                ("Secretariats", "secretraiatNames"),
                ("Employee IDs", "employeeIds"),
                ("Employee names", "employeeNames"),
                ("Clusters", "clusterIds"),
            ] {
                let values: Vec<&str> = response[key]
                    .as_array()
                    .map(|list| list.iter().filter_map(Value::as_str).collect())
                    .unwrap_or_default();
                println!("{}: {}", label, values.join(", "));
            }
        }
    }
    Ok(())
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
