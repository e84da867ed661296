//! `oauth2-datastore`: register clients and check a grant-storage backend.

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use oauth2_datastore::admin::{client_summary, Backend};
use oauth2_datastore::Config;
use oauth2_observability::{encode_prometheus_text, init_telemetry, shutdown_telemetry, Metrics};

#[derive(Parser)]
#[command(name = "oauth2-datastore")]
#[command(about = "Administer OAuth2 grant storage on a document store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Datastore URL (overrides application.conf)
    #[arg(long, global = true, env = "OAUTH2_DATASTORE_URL")]
    url: Option<String>,

    /// Database name for backends that have one
    #[arg(long, global = true, env = "OAUTH2_DATASTORE_DATABASE")]
    database: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage client registrations
    Client(ClientArgs),
    /// Ping the configured backend
    Check,
}

#[derive(Args)]
struct ClientArgs {
    #[command(subcommand)]
    command: ClientCommands,
}

#[derive(Subcommand)]
enum ClientCommands {
    /// Create or replace a client
    Put {
        #[arg(long)]
        id: String,
        #[arg(long)]
        secret: String,
        #[arg(long)]
        redirect_uri: String,
        /// Opaque string stored alongside the client
        #[arg(long)]
        user_data: Option<String>,
    },
    /// Show a client (the secret is not printed)
    Get {
        #[arg(long)]
        id: String,
    },
    /// Remove a client
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Loaded before telemetry; the fallback reason is logged once tracing is up.
    let (mut config, fallback_reason) = Config::load();
    if let Some(url) = cli.url.clone() {
        config.datastore.url = url;
    }
    if let Some(database) = cli.database.clone() {
        config.datastore.database = Some(database);
    }

    if let Err(e) = init_telemetry(&config.telemetry.service_name) {
        eprintln!("failed to initialize telemetry: {e}");
    }
    if let Some(reason) = fallback_reason {
        tracing::warn!("{}", reason);
    }
    tracing::info!(config = ?config.sanitized(), "configuration loaded");

    let result = run(&cli, &config).await;
    shutdown_telemetry();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = if config.telemetry.metrics_enabled {
        Some(Metrics::new()?)
    } else {
        None
    };

    let backend = Backend::open(&config.datastore, metrics.clone()).await?;

    let outcome = execute(&cli.command, &backend).await;
    backend.close().await?;

    if let Some(metrics) = metrics {
        let text = encode_prometheus_text(&metrics.registry)?;
        eprint!("{}", String::from_utf8_lossy(&text));
    }

    outcome
}

async fn execute(command: &Commands, backend: &Backend) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Check => {
            backend.check().await?;
            println!("ok");
        }
        Commands::Client(args) => match &args.command {
            ClientCommands::Put {
                id,
                secret,
                redirect_uri,
                user_data,
            } => {
                let client = backend
                    .put_client(id, secret, redirect_uri, user_data.as_deref())
                    .await?;
                println!("{}", serde_json::to_string_pretty(&client_summary(&client))?);
            }
            ClientCommands::Get { id } => {
                let client = backend.get_client(id).await?;
                println!("{}", serde_json::to_string_pretty(&client_summary(&client))?);
            }
            ClientCommands::Delete { id } => {
                backend.delete_client(id).await?;
                println!("deleted {id}");
            }
        },
    }
    Ok(())
}
