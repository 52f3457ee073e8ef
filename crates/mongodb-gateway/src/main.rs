mod routes;

use std::collections::BTreeSet;
use std::net::ToSocketAddrs as _;
use std::sync::Arc;

use anyhow::anyhow;
use clap::Parser;
use configuration::{CollectionsSpec, Configuration};
use mongodb_gateway_common::state::{try_init_state, ConnectorState};
use tracing_subscriber::EnvFilter;

use crate::routes::AppState;

/// Read-only REST gateway for MongoDB collections.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// Enable diagnostic logging of constructed queries and responses.
    #[arg(short, long)]
    pub verbose: bool,

    /// Host name to bind the HTTP server to.
    #[arg(long, default_value = "localhost")]
    pub server_host: String,

    /// Port number to bind the HTTP server to.
    #[arg(long, default_value_t = 8080)]
    pub server_port: u16,

    /// MongoDB host name.
    #[arg(long, env = "MONGO_HOST", default_value = "localhost")]
    pub mongo_host: String,

    /// MongoDB port number.
    #[arg(long, env = "MONGO_PORT", default_value_t = 27017)]
    pub mongo_port: u16,

    /// MongoDB user.
    #[arg(long, env = "MONGO_USER")]
    pub mongo_user: Option<String>,

    /// MongoDB password.
    #[arg(long, env = "MONGO_PASSWORD")]
    pub mongo_password: Option<String>,

    /// MongoDB database name. The gateway refuses to start without one.
    #[arg(long, env = "MONGO_DBNAME")]
    pub mongo_dbname: String,

    /// Comma-separated collection whitelist, or `_all` for every collection currently in the
    /// database.
    #[arg(long, default_value = "_all")]
    pub mongo_collections: CollectionsSpec,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut configuration = Configuration {
        mongo_host: args.mongo_host,
        mongo_port: args.mongo_port,
        mongo_user: args.mongo_user,
        mongo_password: args.mongo_password,
        database: args.mongo_dbname,
        collections: BTreeSet::new(),
        verbose: args.verbose,
    };
    let connector = try_init_state(&configuration)?;
    configuration.collections = resolve_collections(&connector, args.mongo_collections).await?;
    let configuration = Arc::new(configuration);

    tracing::info!(
        database = %configuration.database,
        collections = ?configuration.collections,
        "gateway configured"
    );
    // The password field is skipped during serialization.
    tracing::debug!(
        configuration = %serde_json::to_string(configuration.as_ref())?,
        "resolved configuration"
    );

    let address = (args.server_host.as_str(), args.server_port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| anyhow!("cannot resolve server host \"{}\"", args.server_host))?;
    tracing::info!(%address, "starting HTTP server");

    let app = routes::router(AppState {
        configuration,
        connector,
    });
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

/// Resolves the whitelist spec into a concrete, non-empty set of collection names. The `_all`
/// sentinel is resolved once here; the set never changes afterward.
async fn resolve_collections(
    connector: &ConnectorState,
    spec: CollectionsSpec,
) -> anyhow::Result<BTreeSet<String>> {
    let collections: BTreeSet<String> = match spec {
        CollectionsSpec::All => connector
            .database()
            .list_collection_names(None)
            .await?
            .into_iter()
            .collect(),
        CollectionsSpec::Explicit(names) => names.into_iter().collect(),
    };
    if collections.is_empty() {
        Err(anyhow!(
            "collection whitelist is empty; pass --mongo-collections with at least one name"
        ))
    } else {
        Ok(collections)
    }
}
