mod commands;
mod config;
mod formats;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{components, export, init, ComponentsArgs, ExportArgs, InitArgs};
use tracing_subscriber::EnvFilter;

/// UI builder CLI - export documents built from registered components
#[derive(Parser, Debug)]
#[command(name = "uibuilder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a config file and a starter document
    Init(InitArgs),

    /// Export a document to json, html, react or blocks
    Export(ExportArgs),

    /// List the component palette
    Components(ComponentsArgs),
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Export(args) => export(args, &cwd),
                Command::Components(args) => components(args),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
