use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use orgviz::fixture::OrgData;
use orgviz::{routes, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "-help" || arg == "--help") {
        println!("Usage: orgviz [OPTIONS]");
        println!("Options:");
        println!("  -config <path>  Path to configuration file (default: ./etc/orgviz.toml)");
        println!("  -help, --help   Print this help message");
        return Ok(());
    }

    let config_path = args
        .iter()
        .skip_while(|arg| arg.as_str() != "-config")
        .nth(1)
        .map(|s| s.to_string())
        .unwrap_or_else(|| "./etc/orgviz.toml".to_string());

    // Load configuration first (before logging init)
    let config = Config::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Could not load config file: {}, using defaults", e);
        Config::default()
    });

    // Initialize logging
    // Priority: RUST_LOG env var > config file > default "info"
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    fmt::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Starting orgviz server...");
    info!("Loading configuration from: {}", config_path);

    let data = match &config.data_file {
        Some(path) => {
            let data = OrgData::load(path).map_err(|e| {
                tracing::error!("Failed to load data file {}: {}", path.display(), e);
                anyhow::anyhow!("Failed to load data file {}: {}", path.display(), e)
            })?;
            info!("Loaded organization data from {}", path.display());
            data
        }
        None => {
            info!("No data file configured, using built-in sample data");
            OrgData::sample()
        }
    };
    info!(
        organizations = data.organizations.len(),
        divisions = data.divisions.len(),
        staff = data.staff.len(),
        relations = data.relations.len(),
        "Organization snapshot ready"
    );

    // Parse address
    let addr: SocketAddr = match config.addr.parse() {
        Ok(addr) => addr,
        Err(_) => {
            tracing::warn!("Invalid address '{}', using default 0.0.0.0:8080", config.addr);
            SocketAddr::from(([0, 0, 0, 0], 8080))
        }
    };

    // Create application state and router
    let state = AppState::new(data, config);
    let app = routes::create_router(state);

    info!("Server listening on {}", addr);

    // Start server
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
