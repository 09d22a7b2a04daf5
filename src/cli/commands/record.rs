use clap::Subcommand;
use uuid::Uuid;

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_op_result, read_entry_from_stdin};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum RecordCommands {
    #[command(about = "Overwrite the row with this id from an entry on stdin")]
    Update {
        #[arg(help = "Row id as listed by `bk data list`")]
        id: Uuid,
    },

    #[command(about = "Delete the row with this id")]
    Delete {
        #[arg(help = "Row id as listed by `bk data list`")]
        id: Uuid,
    },
}

pub async fn handle(client: &ApiClient, cmd: RecordCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let result = match cmd {
        RecordCommands::Update { id } => {
            let entry = read_entry_from_stdin()?;
            client.update_record(id, &entry).await?
        }
        RecordCommands::Delete { id } => client.delete_record(id).await?,
    };
    output_op_result(&output_format, &result)
}
