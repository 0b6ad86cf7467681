use clap::Parser;
use sprintsync_api::{AppState, EmbeddingFailurePolicy, RestApi};
use sprintsync_core::{AssignmentEngine, Embedder, MetricsAggregator, DEFAULT_EMBEDDING_DIM};
use sprintsync_embedding::{build_embedder, openai, OpenAiConfig, ProviderKind};
use sprintsync_storage::StorageManager;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Internal sprint-tracking API
#[derive(Parser, Debug)]
#[command(name = "sprintsync")]
#[command(about = "Sprint tracking API with embedding-based task assignment", long_about = None)]
struct Args {
    /// HTTP API port
    #[arg(long, env = "SPRINTSYNC_HTTP_PORT", default_value_t = 8000)]
    http_port: u16,

    /// Directory for the JSON snapshot; in-memory only when unset
    #[arg(short, long, env = "SPRINTSYNC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Embedding provider: openai, hashing or zero
    #[arg(long, env = "SPRINTSYNC_EMBEDDING_PROVIDER", default_value = "openai")]
    embedding_provider: ProviderKind,

    /// Dimension of every embedding vector
    #[arg(long, env = "SPRINTSYNC_EMBEDDING_DIM", default_value_t = DEFAULT_EMBEDDING_DIM)]
    embedding_dim: usize,

    /// Embedding model name
    #[arg(long, env = "SPRINTSYNC_EMBEDDING_MODEL", default_value = openai::DEFAULT_MODEL)]
    embedding_model: String,

    /// Provider request timeout in seconds
    #[arg(long, default_value_t = 30)]
    embedding_timeout_secs: u64,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// OpenAI-compatible base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = openai::DEFAULT_BASE_URL)]
    openai_base_url: String,

    /// What task creation does when embedding fails: fail or store-unassigned
    #[arg(long, env = "SPRINTSYNC_ON_EMBEDDING_FAILURE", default_value = "fail")]
    on_embedding_failure: EmbeddingFailurePolicy,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.embedding_dim == 0 {
        anyhow::bail!("--embedding-dim must be greater than zero");
    }

    info!("Starting SprintSync v{}", env!("CARGO_PKG_VERSION"));
    info!("HTTP API port: {}", args.http_port);

    let storage = Arc::new(match &args.data_dir {
        Some(dir) => {
            info!("Data directory: {:?}", dir);
            StorageManager::open(dir)?
        }
        None => {
            info!("No data directory, running in memory");
            StorageManager::in_memory()
        }
    });

    let openai = OpenAiConfig {
        api_key: args.openai_api_key.clone().unwrap_or_default(),
        base_url: args.openai_base_url.clone(),
        model: args.embedding_model.clone(),
        dimensions: args.embedding_dim,
        timeout: Duration::from_secs(args.embedding_timeout_secs),
    };
    let embedder = build_embedder(args.embedding_provider, openai)?;
    info!(
        provider = embedder.name(),
        dim = args.embedding_dim,
        on_failure = %args.on_embedding_failure,
        "Embedding provider ready"
    );

    let engine = AssignmentEngine::with_dimension(embedder, args.embedding_dim);
    let state = Arc::new(AppState::new(storage.clone(), engine, args.on_embedding_failure));
    let metrics = Arc::new(MetricsAggregator::new());

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, metrics, http_port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("SprintSync started successfully");
    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    storage.save()?;
    Ok(())
}
