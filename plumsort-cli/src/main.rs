//! PlumSort CLI - inspect the access policy from a shell.
//!
//! ```bash
//! plumsort check /users --role technician
//! plumsort menu farmer
//! plumsort --config ./plumsort.toml permissions
//! ```
//!
//! See `plumsort --help` for all available commands and options.

mod commands;

use clap::{Parser, Subcommand};
use plumsort_core::logging::{init_logging, LogLevel, LogOutput, LoggingConfig};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plumsort", about = "PlumSort access policy inspector", version)]
struct Cli {
    /// Config file (default: ./plumsort.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what the guard does when a user opens a path
    Check {
        /// Path as typed in the address bar, e.g. /farms/12
        path: String,

        /// Role of the signed-in user; omit for a signed-out visitor
        #[arg(long)]
        role: Option<String>,
    },

    /// Print a role's navigation menu
    Menu {
        role: String,

        #[arg(long)]
        json: bool,
    },

    /// List the permissions granted to one role, or to every role
    Permissions {
        role: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// List the route table
    Routes,

    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Write a default configuration file
    Init {
        #[arg(default_value = plumsort_core::config::DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warn };
    let logging =
        LoggingConfig::default().with_level(level).with_output(LogOutput::Stderr { format: None });
    if let Err(e) = init_logging(&logging) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let mut out = io::stdout().lock();
    let result = match cli.command {
        Commands::Config { action: ConfigAction::Init { path, force } } => {
            commands::config::init(&path, force, &mut out)
        }
        command => commands::load_config(cli.config.as_deref())
            .and_then(|config| match command {
                Commands::Check { path, role } => {
                    commands::check::run(&config, &path, role.as_deref(), &mut out)
                }
                Commands::Menu { role, json } => {
                    commands::menu::run(&config, &role, json, &mut out)
                }
                Commands::Permissions { role, json } => {
                    commands::permissions::run(&config, role.as_deref(), json, &mut out)
                }
                Commands::Routes => commands::routes::run(&mut out),
                Commands::Config { action: ConfigAction::Show } => {
                    commands::config::show(&config, &mut out)
                }
                Commands::Config { action: ConfigAction::Init { .. } } => Ok(()),
            }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
