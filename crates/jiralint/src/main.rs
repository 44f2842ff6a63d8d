#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod error;
mod jira;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Lint Jira issues for hygiene problems and grade their quality"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "JIRALINT_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Search and rate issues against the health checks
    Rate(jira::rate::RateOptions),

    /// Search Jira issues using JQL
    Search(jira::search::SearchOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Rate(options) => jira::rate::handler(options, app.global).await,
        SubCommands::Search(options) => jira::search::handler(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
