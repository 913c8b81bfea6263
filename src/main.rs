use clap::Parser;
use tracing::{info, Level};
use video_fetch::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Logs go to stderr so they don't interleave with prompts
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    info!("Starting video-fetch v{}", env!("CARGO_PKG_VERSION"));

    cli.run().await?;

    Ok(())
}
