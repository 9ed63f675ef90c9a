//! Ingot CLI: LLM-assisted CSV to typed JSON converter.

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::convert::ConvertArgs;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            file,
            output,
            provider,
            model,
            print,
            any_extension,
        } => {
            commands::convert::run(ConvertArgs {
                file,
                output,
                provider,
                model,
                print,
                any_extension,
                verbose: cli.verbose,
            })
            .await
        }
        Commands::Preview { file, json } => commands::preview::run(file, json, cli.verbose).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "ingot=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
