use clap::Parser;
use std::path::PathBuf;
use visearch::cli::dispatcher::{Dispatcher, GlobalOptions};
use visearch::cli::main_types::Cli;
use visearch::storage::config::Config;
use visearch::utils::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Load Config
    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| PathBuf::from(dir).join("config.toml"));

    let config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    if cli.verbose {
        eprintln!("Verbose mode is enabled");
        if let Some(config_dir) = &cli.config_dir {
            eprintln!("Using config directory: {}", config_dir);
        }
    }

    let dispatcher = Dispatcher::new(
        config,
        GlobalOptions {
            verbose: cli.verbose,
            config_path,
            access_key: cli.access_key,
            secret_key: cli.secret_key,
            endpoint: cli.endpoint,
            format: cli.format,
        },
    );

    // Execute the command
    if let Err(e) = dispatcher.dispatch(cli.command) {
        eprintln!("{} Error: {}", e.severity().emoji(), e);
        if let Some(hint) = e.troubleshooting_hint() {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}
