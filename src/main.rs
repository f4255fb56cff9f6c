use std::{fs::File, path::Path, sync::Mutex};

use clap::Parser;
use cli::{commands::Cli, handlers::CommandHandler};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod bot;
mod cli;
mod client;
mod config;
mod prompts;
mod telegram;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    CommandHandler::new(&cli).execute().await
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let file_layer = match log_file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(File::create(path)?)),
        ),
        None => None,
    };
    let stderr_layer = log_file
        .is_none()
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "marketing_bot=info".into()),
        ))
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}
