use clap::Parser;
use pkg_api::server::{ServerConfig, start_server};
use pkg_constants::network::{DEFAULT_API_PORT, DEFAULT_BASE_API_PATH, DEFAULT_BIND_ADDRESS};
use pkg_constants::paths::DEFAULT_SERVER_CONFIG;
use pkg_types::config::{ServerConfigFile, StoreBackend, load_config_file};
use std::io::IsTerminal;
use std::net::{IpAddr, SocketAddr};
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "dashboard-server",
    about = "Dashboard backend serving environment variables stored as Kubernetes secrets"
)]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = DEFAULT_SERVER_CONFIG)]
    config: String,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind to
    #[arg(long)]
    bind_address: Option<IpAddr>,

    /// Prefix for all REST routes
    #[arg(long)]
    base_path: Option<String>,

    /// Secret store backend: kubernetes or memory
    #[arg(long)]
    store: Option<StoreBackend>,

    /// Bearer token API clients must present (any bearer is accepted when unset)
    #[arg(long)]
    token: Option<String>,

    /// Log filter, overrides RUST_LOG (e.g. "debug" or "pkg_envvars=trace")
    #[arg(long)]
    log_level: Option<String>,
}

/// Compact human output on a terminal, JSON lines otherwise.
fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::builder()
            .with_default_directive(tracing::Level::INFO.into())
            .from_env_lossy(),
    };

    let fmt_layer = if std::io::stderr().is_terminal() {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .compact()
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    // Load config file (returns defaults if file not found)
    let file_cfg: ServerConfigFile = load_config_file(&cli.config)?;
    info!("Config file: {}", cli.config);

    // Merge: CLI args > config file > defaults
    let port = cli.port.or(file_cfg.port).unwrap_or(DEFAULT_API_PORT);
    let bind_address = match cli.bind_address {
        Some(addr) => addr,
        None => file_cfg
            .bind_address
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDRESS)
            .parse()?,
    };
    let base_path = cli
        .base_path
        .or(file_cfg.base_path)
        .unwrap_or_else(|| DEFAULT_BASE_API_PATH.to_string());
    let store = cli.store.or(file_cfg.store).unwrap_or_default();
    let api_token = cli.token.or(file_cfg.token).filter(|t| !t.is_empty());

    info!("Starting dashboard-server");
    info!("  Address:   {}:{}", bind_address, port);
    info!("  Base path: {}", base_path);
    info!("  Store:     {}", store);
    match &api_token {
        Some(token) => info!(
            "  Token:     {}***",
            token.chars().take(4).collect::<String>()
        ),
        None => info!("  Token:     <any bearer>"),
    }

    let config = ServerConfig {
        addr: SocketAddr::new(bind_address, port),
        base_path,
        store,
        api_token,
    };

    start_server(config).await?;

    Ok(())
}
