#![allow(clippy::exit)]

mod cli;
mod commands;
mod context;
mod output;
mod timing;

use anyhow::Result;
use clap::Parser as _;
use tracing::info;
use userdash_business::UserDashboard;

use crate::cli::{Cli, Commands};
use crate::commands::{run_list, run_view};
use crate::context::build_config;
use crate::output::Output;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    timing::init_tracing(cli.verbose, cli.timing);

    let config = build_config(&cli.config)?;
    info!(
        "Using {} ({} attempts, {:?} apart, {} per page)",
        config.api_url(),
        config.max_retries(),
        config.retry_delay(),
        config.items_per_page()
    );

    let mut dashboard = UserDashboard::new(&config);
    let result = match cli.command {
        Commands::List { page, all } => run_list(&mut dashboard, page, all).await,
        Commands::View { id } => run_view(&mut dashboard, id).await,
    };
    dashboard.shutdown().await;

    if let Err(e) = result {
        Output::new().error(format!("{e:#}"));
        std::process::exit(1);
    }
    Ok(())
}
