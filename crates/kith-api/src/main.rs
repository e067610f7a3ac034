//! CLI entry point for the kith-api service.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use kith_graph::{GraphClient, GraphConfig};

use kith_api::config::ApiConfig;
use kith_api::{http, seed};

#[derive(Parser)]
#[command(name = "kith-api")]
#[command(about = "HTTP API for the Kith personal social graph")]
struct Cli {
    /// Config file prefix (default: kith).
    #[arg(short, long, default_value = "kith")]
    config: String,

    /// Override the listen port.
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Wipe the database and load sample data.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let mut api_config = load_api_config(&cli.config)?;
    if let Some(port) = cli.port {
        api_config.port = port;
    }

    let graph_config = load_graph_config(&cli.config);
    let client = GraphClient::connect(&graph_config).await?;

    match cli.command {
        Some(Command::Seed) => {
            seed::run(&client).await?;
            tracing::info!("Seed data created");
        }
        Some(Command::Serve) | None => {
            // A failed ping is logged, not fatal: the health endpoint
            // keeps reporting the database as unreachable.
            match client.verify_connectivity().await {
                Ok(()) => tracing::info!("Neo4j reachable"),
                Err(e) => tracing::warn!(error = %e, "Neo4j unreachable at startup"),
            }
            http::serve(client, &api_config).await?;
        }
    }

    Ok(())
}

fn load_api_config(file_prefix: &str) -> anyhow::Result<ApiConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("KITH_API")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.get::<ApiConfig>("api") {
        Ok(c) => Ok(c),
        Err(_) => Ok(ApiConfig::default()),
    }
}

fn load_graph_config(file_prefix: &str) -> GraphConfig {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("KITH")
                .separator("__")
                .try_parsing(true),
        )
        .build();

    match cfg {
        Ok(c) => GraphConfig {
            uri: c
                .get_string("neo4j.uri")
                .unwrap_or_else(|_| "bolt://localhost:7687".to_string()),
            user: c
                .get_string("neo4j.user")
                .unwrap_or_else(|_| "neo4j".to_string()),
            password: c
                .get_string("neo4j.password")
                .unwrap_or_else(|_| "kith-dev".to_string()),
            ..Default::default()
        },
        Err(_) => GraphConfig::default(),
    }
}
