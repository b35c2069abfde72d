//! Pagemend CLI - Command line interface for Pagemend
//!
//! Analyze and repair web page artifacts, locally or over HTTP.

mod commands;

use clap::{Parser, Subcommand};
use pagemend_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{FixArgs, ServeArgs};

/// Pagemend: find and fix defects in web page artifacts
#[derive(Parser, Debug)]
#[command(name = "pagemend")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Completion model to use (overrides config and env)
    #[arg(long, global = true, env = "PAGEMEND_MODEL")]
    model: Option<String>,

    /// Server port (overrides config and env)
    #[arg(long, global = true, env = "PAGEMEND_PORT")]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Analyze page artifacts and apply approved fixes
    #[command(visible_alias = "f")]
    Fix(FixArgs),

    /// Run the HTTP analysis server
    #[command(visible_alias = "s")]
    Serve(ServeArgs),

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.model.clone(), cli.port)?;

    if cli.verbose {
        tracing::info!(
            model = %config.completion.model,
            port = config.server.port,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("pagemend {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Fix(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Serve(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Config) => {
            println!("Pagemend Configuration");
            println!("======================");
            println!();
            println!("Completion Settings:");
            println!("  model: {}", config.completion.model);
            println!(
                "  endpoint: {}",
                config.completion.endpoint.as_deref().unwrap_or("(default)")
            );
            println!("  api_keys: {} configured", config.completion.api_keys.len());
            println!("  max_retries: {}", config.completion.max_retries);
            println!();
            println!("Knowledge Settings:");
            println!(
                "  corpus_path: {}",
                config
                    .knowledge
                    .corpus_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(embedded)".to_string())
            );
            println!("  chunk_size: {}", config.knowledge.chunk_size);
            println!("  chunk_overlap: {}", config.knowledge.chunk_overlap);
            println!("  top_k: {}", config.knowledge.top_k);
            println!();
            println!("Server Settings:");
            println!("  host: {}", config.server.host);
            println!("  port: {}", config.server.port);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("Pagemend - find and fix defects in web page artifacts");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
