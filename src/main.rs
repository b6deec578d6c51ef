//! Showcase site server CLI
//!
//! Serves the contact form endpoint (and optionally the static site).

use anyhow::Context;
use clap::{Parser, Subcommand};
use showcase_site::{
    config::Config,
    contact::{validate_form, SmtpMailer, Submission},
    server::{run, ServerConfig},
    VERSION,
};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "showcase-site")]
#[command(version = VERSION)]
#[command(about = "Contact form relay and static server for the showcase site", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Env file with configuration (missing file is ignored)
    #[arg(long, global = true, default_value = ".env")]
    env_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind to (overrides BIND_ADDR)
        #[arg(long)]
        bind: Option<IpAddr>,

        /// Directory served as the static site (overrides STATIC_DIR)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Validate a submission stored as JSON without sending it
    Check {
        /// Path to the JSON submission
        file: PathBuf,
    },

    /// Show the effective configuration
    Config,
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("showcase_site=debug,tower_http=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("showcase_site=info,tower_http=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Serve {
            port,
            bind,
            static_dir,
        } => cmd_serve(&cli.env_file, port, bind, static_dir).await,
        Commands::Check { file } => cmd_check(&file),
        Commands::Config => cmd_config(&cli.env_file),
    }
}

async fn cmd_serve(
    env_file: &Path,
    port: Option<u16>,
    bind: Option<IpAddr>,
    static_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = Config::from_env_and_file(env_file).context("loading configuration")?;
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(bind) = bind {
        config.bind = bind;
    }
    if static_dir.is_some() {
        config.static_dir = static_dir;
    }

    for warning in config.warnings() {
        tracing::warn!("{}", warning);
    }

    let mailer = SmtpMailer::new(&config.mail).context("creating SMTP transport")?;
    let server_config = ServerConfig::new(config.bind, config.port, config.static_dir.clone());
    let handle = run(server_config, Arc::new(mailer)).await?;

    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl+C")?;
    handle.shutdown().await;

    Ok(())
}

fn cmd_check(file: &Path) -> anyhow::Result<()> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let submission: Submission =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", file.display()))?;

    let errors = validate_form(&submission);
    if errors.is_empty() {
        println!("Submission is valid.");
        return Ok(());
    }

    println!("Submission is not valid:");
    for error in &errors {
        println!("  - {}: {}", error.field, error.message);
    }
    anyhow::bail!("{} field(s) failed validation", errors.len())
}

fn cmd_config(env_file: &Path) -> anyhow::Result<()> {
    let config = Config::from_env_and_file(env_file).context("loading configuration")?;

    println!("Configuration");
    println!("=============");
    println!();
    println!("Env file: {}", env_file.display());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);

    for warning in config.warnings() {
        println!("warning: {warning}");
    }
    Ok(())
}
