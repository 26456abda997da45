mod config;
mod database;
mod entities;
mod format;
mod http_server;
mod logging;
mod ports;
mod services;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{config::Config, database::Database, logging::init_tracing};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "FYYUR_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `fyyur=debug,tower_http=debug` (default: from config)
    #[arg(long, global = true, env = "FYYUR_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP server
    Serve {
        /// The port to run the server on
        #[arg(short, long, env = "FYYUR_HTTP_PORT")]
        port: Option<u16>,

        /// The SQLite database file
        #[arg(short, long, env = "FYYUR_DATABASE")]
        database: Option<PathBuf>,

        /// OTLP collector to export spans to
        #[arg(long, env = "FYYUR_OTLP_ENDPOINT")]
        otlp_endpoint: Option<String>,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let mut config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .wrap_err("Failed to load fyyur config")?;

    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }

    match args.command {
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Serve {
            port,
            database,
            otlp_endpoint,
        } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(database) = database {
                config.set_database(&database);
            }
            if otlp_endpoint.is_some() {
                config.otlp_endpoint = otlp_endpoint;
            }

            let tracer_provider =
                init_tracing(&config.log_level, config.otlp_endpoint.as_deref())?;

            tracing::debug!("Fyyur starting");
            let database = Database::open(&config.database_path()).await?;

            tracing::info!("Starting HTTP server on port: {}", config.port);
            let served = http_server::app::start(config.port, database).await;

            if let Some(provider) = tracer_provider
                && let Err(e) = provider.shutdown()
            {
                eprintln!("Failed to flush traces: {e}");
            }

            served?;
        }
    }

    Ok(())
}
