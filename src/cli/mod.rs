pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use client::ApiClient;

#[derive(Parser)]
#[command(name = "bk")]
#[command(about = "bk - Command-line client for the Bangaru Kutumbam tracker")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "BK_SERVER",
        default_value = "http://localhost:3000",
        help = "Tracker server base URL"
    )]
    pub server: String,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create the workbook, sheets and sample data if missing")]
    Init,

    #[command(about = "Check server and store reachability")]
    Ping,

    #[command(about = "Check a username/password pair")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Password")]
        password: String,
    },

    #[command(about = "List distinct values usable as filters")]
    Options,

    #[command(about = "Positional data operations")]
    Data {
        #[command(subcommand)]
        cmd: commands::data::DataCommands,
    },

    #[command(about = "Data operations addressed by durable row id")]
    Record {
        #[command(subcommand)]
        cmd: commands::record::RecordCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = ApiClient::new(&cli.server)?;

    match cli.command {
        Commands::Init => commands::init::handle(&client, output_format).await,
        Commands::Ping => commands::init::ping(&client, output_format).await,
        Commands::Login { username, password } => {
            commands::auth::login(&client, &username, &password, output_format).await
        }
        Commands::Options => commands::data::options(&client, output_format).await,
        Commands::Data { cmd } => commands::data::handle(&client, cmd, output_format).await,
        Commands::Record { cmd } => commands::record::handle(&client, cmd, output_format).await,
    }
}
