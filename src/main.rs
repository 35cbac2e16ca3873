use chronic::cli::commands::Cli;
use chronic::cli::handlers;
use chronic::io::{config_io, logging};
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            let config = match config_io::load_config(cli.config.as_deref()) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("error: {}", e);
                    std::process::exit(1);
                }
            };
            let log_guard = logging::init_logging(&config.log);
            if let Err(e) = chronic::tui::run(&cli.workspace, config) {
                tracing::error!(error = %e, "tui exited with error");
                drop(log_guard);
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(&cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
