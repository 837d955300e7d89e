use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use paperbrief_common::{logger, AppConfig};
use std::path::PathBuf;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "paperbrief")]
#[command(about = "PaperBrief - research paper summarization and search service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Log to the console only (no log file)
        #[arg(long)]
        console_log: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // AppConfig::from_env() also loads .env, but only from the working directory
    load_dotenv_from_project_root();

    let (host, port, console_log) = match cli.command {
        Some(Commands::Serve {
            host,
            port,
            console_log,
        }) => (host, port, console_log),
        None => (None, None, false),
    };

    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if let Some(host) = host {
        config.server_host = host;
    }
    if let Some(port) = port {
        config.server_port = port;
    }
    config.validate().context("Invalid configuration")?;

    if console_log {
        logger::setup_console_logging(&config.log_level)?;
    } else {
        logger::setup_logging(&config.log_dir, &config.log_level)?;
    }

    tracing::info!("PaperBrief starting...");
    tracing::info!("  Bind: {}", config.server_bind_address());
    tracing::info!("  Uploads: {}", config.upload_dir.display());
    tracing::info!("  Hosted model: {}", config.openai_model);
    tracing::info!("  Local model: {}", config.local_model);

    println!("Server listening on http://{}", config.server_bind_address());

    paperbrief_server::start_server(config).await?;

    Ok(())
}
