use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ont2wb::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "ont2wb",
    version,
    about = "Migrate an RDF/OWL ontology into a Wikibase instance",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML configuration file (defaults to ONT2WB_* environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create items, properties and claims on the wiki
    Migrate {
        /// Ontology to migrate (Turtle file or http(s) URL)
        #[arg(short, long)]
        input: Option<String>,

        /// URL of the wiki's api.php
        #[arg(long)]
        api_url: Option<String>,

        /// Link store file
        #[arg(long)]
        link_file: Option<PathBuf>,

        /// IRI of the ontology node itself, never migrated
        #[arg(long)]
        base_uri: Option<String>,

        /// Log what would be created instead of calling the wiki
        #[arg(long, default_value = "false")]
        dry_run: bool,

        /// Log every claim payload
        #[arg(long, default_value = "false")]
        debug_claims: bool,

        /// Log in with a bot password instead of clientlogin
        #[arg(long, default_value = "false")]
        bot: bool,

        /// Wiki user name
        #[arg(long, env = "USER", hide_env_values = true)]
        user: Option<String>,

        /// Wiki password
        #[arg(long, env = "PASSWD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Show how every subject of an ontology would be migrated
    Classify {
        /// Ontology to inspect (Turtle file or http(s) URL)
        #[arg(short, long)]
        input: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print the link store
    Links {
        /// Link store file
        #[arg(long)]
        link_file: Option<PathBuf>,

        /// Output format (text, json, turtle)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    // Initialize tracing/logging
    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ont2wb starting");

    match cli.command {
        Commands::Migrate {
            input,
            api_url,
            link_file,
            base_uri,
            dry_run,
            debug_claims,
            bot,
            user,
            password,
        } => {
            tracing::info!(
                input = ?input,
                api_url = ?api_url,
                dry_run = %dry_run,
                "Starting migrate command"
            );
            let params = commands::MigrateParams {
                input,
                api_url,
                link_file,
                base_uri,
                dry_run,
                debug_claims,
                bot,
                user,
                password,
            };
            commands::migrate(config, params).await?;
        }

        Commands::Classify { input, format } => {
            tracing::info!(input = ?input, format = %format, "Starting classify command");
            commands::classify(config, input, &format).await?;
        }

        Commands::Links { link_file, format } => {
            tracing::info!(link_file = ?link_file, format = %format, "Starting links command");
            commands::links(config, link_file, &format)?;
        }
    }

    tracing::info!("ont2wb completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("ont2wb=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("ont2wb={level},warn"))?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
