mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use keystone_core::ContainerConfig;
use log::{debug, error};

/// Keystone: inspect a component container's layout
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Simple ping command for testing
    #[arg(long)]
    ping: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the components auto-registration would register
    Scan {
        /// Container settings file (.json, .yaml or .toml)
        #[arg(long)]
        config: PathBuf,
    },
    /// List the effective boot files
    BootFiles {
        /// Container settings file (.json, .yaml or .toml)
        #[arg(long)]
        config: PathBuf,
    },
    /// Print the file backing an identifier
    Locate {
        /// Container settings file (.json, .yaml or .toml)
        #[arg(long)]
        config: PathBuf,
        /// Component identifier, e.g. `billing.invoice`
        identifier: String,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    let Some(command) = args.command else {
        if let Err(e) = CliArgs::command().print_help() {
            error!("Failed to print help: {}", e);
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    };

    match run(command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> keystone_core::Result<ExitCode> {
    match command {
        Commands::Scan { config } => {
            for line in cli::scan(&load_config(&config)?)? {
                println!("{}", line);
            }
        }
        Commands::BootFiles { config } => {
            for file in cli::boot_files(&load_config(&config)?)? {
                println!("{}", file);
            }
        }
        Commands::Locate { config, identifier } => match cli::locate(&load_config(&config)?, &identifier) {
            Some(file) => println!("{}", file),
            None => {
                eprintln!("Component '{}' not found", identifier);
                return Ok(ExitCode::FAILURE);
            }
        },
    }
    Ok(ExitCode::SUCCESS)
}

fn load_config(path: &Path) -> keystone_core::Result<ContainerConfig> {
    debug!("Loading container settings from {}", path.display());
    Ok(ContainerConfig::from_file(path)?)
}
