mod actions;
mod args;
mod config;
mod db;
mod error;
mod nlp;
mod report;

use std::{io, process::exit};

use actions::display::print_red;
use args::parser::CliArgs;
use clap::Parser;
use error::ReportResult;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "REPORTLY_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli_args: CliArgs) -> ReportResult<()> {
    let config = config::get_config()?;
    let settings = config::get_pipeline_settings(&config)?;
    let db_path = config::get_data_path(&config)?;
    let conn = db::conn::connect(&db_path)?;
    actions::handler::handle_commands(&conn, &settings, cli_args)
}

fn main() {
    init_logging();
    let cli_args = CliArgs::parse();
    if let Err(err) = run(cli_args) {
        print_red(&format!("Error [{}]: {}", err.category(), err));
        // rejected requests and internal failures exit differently
        exit(if err.is_rejection() { 2 } else { 1 })
    }
}

#[cfg(test)]
pub mod tests;
