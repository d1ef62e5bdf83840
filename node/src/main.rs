use anyhow::{Context, Result};
use axum::extract::State;
use axum::routing::get;
use axum::Router;
use clap::{Args, Parser, Subcommand, ValueEnum};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use seqchain_controller::{describe_metrics, rpc, Config, StrategyPlan, TxReply, JSONRPC_ENDPOINT};
use seqchain_genesis::Genesis;
use seqchain_storage::{get_transaction, open_partition, Partition, StoreConfig};
use serde_json::json;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod version;

use version::{git_commit_hash, SEQCHAIN_VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "seqchain-node",
    version = SEQCHAIN_VERSION,
    about = "Operator tool for seqchain controllers"
)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate config and genesis blobs and print the selected strategy plan
    Check(CheckArgs),
    /// Print the indexed record of a transaction
    Tx(TxArgs),
    /// Serve the JSON-RPC handler over an existing data directory
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct GenesisArgs {
    #[arg(long, value_name = "FILE")]
    genesis: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    upgrade: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(flatten)]
    genesis: GenesisArgs,

    #[arg(long, default_value = "local")]
    node_id: String,
}

#[derive(Args, Debug)]
struct TxArgs {
    /// Chain data directory (parent of block/, state/ and metadata/)
    #[arg(long, value_name = "DIR")]
    data_dir: PathBuf,

    /// Transaction id, hex encoded
    #[arg(long)]
    id: String,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, value_name = "DIR")]
    data_dir: PathBuf,

    #[command(flatten)]
    genesis: GenesisArgs,

    #[arg(long, default_value = "127.0.0.1:9650")]
    listen: SocketAddr,

    #[arg(long, default_value_t = 1)]
    network_id: u32,

    /// Chain id, hex encoded
    #[arg(long)]
    chain_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Command::Check(args) => check(args),
        Command::Tx(args) => lookup_tx(args),
        Command::Serve(args) => serve(args).await,
    }
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
    }
}

fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            describe_metrics();
            info!("Prometheus metrics exporter registered");
            Some(handle)
        }
        Err(err) => {
            warn!("Failed to install Prometheus metrics exporter: {}", err);
            None
        }
    }
}

/// Read an optional blob; a missing path means an empty blob.
fn read_blob(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => Ok(Vec::new()),
    }
}

fn load_genesis(args: &GenesisArgs) -> Result<Genesis> {
    let genesis_bytes = read_blob(args.genesis.as_deref())?;
    let upgrade_bytes = read_blob(args.upgrade.as_deref())?;
    Genesis::new(&genesis_bytes, &upgrade_bytes).context("invalid genesis")
}

fn parse_id(value: &str, field: &str) -> Result<[u8; 32]> {
    let normalized = value.strip_prefix("0x").unwrap_or(value).trim();
    let mut id = [0u8; 32];
    hex::decode_to_slice(normalized, &mut id)
        .with_context(|| format!("invalid {field}: expected 32-byte hex string"))?;
    Ok(id)
}

fn check_report(args: &CheckArgs) -> Result<serde_json::Value> {
    let config_bytes = read_blob(args.config.as_deref())?;
    let config = Config::new(args.node_id.clone(), &config_bytes).context("invalid config")?;
    let genesis = load_genesis(&args.genesis)?;

    Ok(json!({
        "node_id": config.node_id(),
        "log_level": config.log_level,
        "plan": StrategyPlan::from_config(&config),
        "hrp": genesis.hrp,
        "allocations": genesis.custom_allocation.len(),
        "upgrades": genesis.upgrades().len(),
    }))
}

fn check(args: CheckArgs) -> Result<()> {
    let report = check_report(&args)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn lookup_tx(args: TxArgs) -> Result<()> {
    let id = parse_id(&args.id, "transaction id")?;
    let store = open_partition(&args.data_dir, Partition::Metadata, &StoreConfig::default())
        .context("failed to open metadata store")?;
    let reply = TxReply::from(get_transaction(&store, &id)?);
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

async fn render_metrics(State(handle): State<Option<PrometheusHandle>>) -> String {
    handle.map(|handle| handle.render()).unwrap_or_default()
}

async fn serve(args: ServeArgs) -> Result<()> {
    info!(
        version = SEQCHAIN_VERSION,
        commit = git_commit_hash(),
        data_dir = %args.data_dir.display(),
        "starting seqchain node"
    );
    let prometheus = init_metrics();

    let genesis = Arc::new(load_genesis(&args.genesis)?);
    let chain_id = match &args.chain_id {
        Some(value) => parse_id(value, "chain id")?,
        None => [0u8; 32],
    };
    let store = open_partition(&args.data_dir, Partition::Metadata, &StoreConfig::default())
        .context("failed to open metadata store")?;
    let handler = rpc::handler(genesis, args.network_id, chain_id, Arc::new(store))
        .context("failed to build JSON-RPC handler")?;

    let app = Router::new()
        .nest(JSONRPC_ENDPOINT, handler)
        .route("/metrics", get(render_metrics).with_state(prometheus))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind listener on {}", args.listen))?;
    info!(addr = %args.listen, endpoint = JSONRPC_ENDPOINT, "serving JSON-RPC");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", err);
            }
            info!("Shutting down seqchain node");
        })
        .await
        .context("server terminated unexpectedly")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_arguments_parse() {
        let cli = Cli::try_parse_from([
            "seqchain-node",
            "--log-format",
            "json",
            "serve",
            "--data-dir",
            "/tmp/chain",
            "--listen",
            "0.0.0.0:8080",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.listen.port(), 8080);
        assert_eq!(args.network_id, 1);
    }

    #[test]
    fn check_report_reflects_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, br#"{"test_mode": true}"#).unwrap();

        let args = CheckArgs {
            config: Some(config_path),
            genesis: GenesisArgs {
                genesis: None,
                upgrade: None,
            },
            node_id: "op".to_string(),
        };
        let report = check_report(&args).unwrap();
        assert_eq!(report["plan"]["mode"], "manual");
        assert_eq!(report["node_id"], "op");
        assert_eq!(report["hrp"], "seq");
    }

    #[test]
    fn missing_blob_is_an_error() {
        let dir = TempDir::new().unwrap();
        let absent = dir.path().join("absent.json");
        assert!(read_blob(Some(absent.as_path())).is_err());
        assert!(read_blob(None).unwrap().is_empty());
    }

    #[test]
    fn ids_accept_optional_prefix() {
        let hex_id = "ab".repeat(32);
        assert_eq!(parse_id(&hex_id, "id").unwrap(), [0xab; 32]);
        assert_eq!(parse_id(&format!("0x{hex_id}"), "id").unwrap(), [0xab; 32]);
        assert!(parse_id("abc", "id").is_err());
    }
}
