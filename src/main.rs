mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;
use commands::handle_memory_command;
use memdev::{logging, InventoryConfig};
use output::print_error;

fn load_config(cli: &Cli) -> Result<InventoryConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => InventoryConfig::load_from_file(path)?,
        None => InventoryConfig::load()?,
    };

    if let Some(path) = &cli.meminfo {
        config.meminfo_path = path.clone();
    }
    if let Some(path) = &cli.dmi_table {
        config.dmi_table_path = path.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }

    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    let result = load_config(&cli).and_then(|config| {
        logging::init_tracing(&config.log);
        handle_memory_command(&cli.command, &config)
    });

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
