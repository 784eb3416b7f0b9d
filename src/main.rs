use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use dropzone_saver::web::server::resolve_addr;
use dropzone_saver::{Config, WebServer};

/// Save files dropped onto a web page into timestamped directories.
#[derive(Debug, Parser)]
#[command(name = "dropzone-saver", version)]
struct Cli {
    /// Address to listen on (host:port)
    #[arg(value_name = "host:port")]
    addr: String,

    /// Configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit with status 2.
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        match Config::load_with_env(&cli.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {e}", cli.config.display());
                eprintln!("Using default configuration.");
                let mut config = Config::default();
                config.apply_env_overrides();
                config
            }
        }
    } else {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    if let Err(e) = dropzone_saver::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        if let Err(e) = dropzone_saver::logging::init_console_only(&config.logging.level) {
            eprintln!("Failed to initialize console logging: {e}");
        }
    }

    let addr = match resolve_addr(&cli.addr).await {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid listen address {}: {}", cli.addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("dropzone-saver starting on {}", addr);
    match WebServer::new(addr, &config).run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
