use clap::Parser;
use tracing_subscriber::EnvFilter;

use bk_tracker::cli::utils::Reported;
use bk_tracker::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = bk_tracker::cli::run(cli).await {
        if e.downcast_ref::<Reported>().is_some() {
            std::process::exit(1);
        }
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
