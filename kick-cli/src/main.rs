mod cli;
mod commands;
mod error;
mod output;
mod session;

use clap::Parser;
use colored::Colorize;
use std::process;
use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::cli::{Args, Commands};
use crate::error::Result;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(args).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Run(run_args) => commands::run::execute(run_args).await,
        Commands::ExportCsv { input, output } => {
            commands::export::export_snapshots(&input, output.as_deref())
        }
        Commands::ExportMessages { input, output } => {
            commands::export::export_messages(&input, output.as_deref())
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    // Logs go to stderr; stdout carries the live status line.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
