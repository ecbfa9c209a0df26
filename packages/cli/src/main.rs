mod app;
mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{components, contexts, ComponentsArgs, ContextsArgs};
use tracing_subscriber::EnvFilter;

/// Formtree CLI - inspect form layouts and the component contexts they produce
#[derive(Parser, Debug)]
#[command(name = "formtree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Raise log level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and print component context trees for an instance
    Contexts(ContextsArgs),

    /// List the flattened components of a layout-set
    Components(ComponentsArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Contexts(args) => contexts(args).await,
        Command::Components(args) => components(args),
    };

    if let Err(err) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}
