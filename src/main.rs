use api_rest::RestConfig;
use quill_core::{data_dir_from_env_value, CoreConfig, DocumentService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the Quill server
///
/// Resolves configuration once, opens the configured document store and serves the REST API
/// plus the static entry page.
///
/// # Environment Variables
/// - `QUILL_REST_ADDR`: server address (default: "0.0.0.0:3000")
/// - `QUILL_DATA_DIR`: directory for the JSON file store (default: in-memory store)
/// - `QUILL_PUBLIC_DIR`: directory holding `index.html` (default: "public")
/// - `QUILL_CORS_ORIGIN`: single allowed CORS origin (default: any origin)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration values are invalid or the store cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quill_run=info".parse()?)
                .add_directive("quill_core=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let core_cfg = CoreConfig::new(data_dir_from_env_value(
        std::env::var("QUILL_DATA_DIR").ok(),
    ))?;
    let rest_cfg = RestConfig::from_env_values(
        std::env::var("QUILL_REST_ADDR").ok(),
        std::env::var("QUILL_PUBLIC_DIR").ok(),
        std::env::var("QUILL_CORS_ORIGIN").ok(),
    )?;

    if !rest_cfg.public_dir().is_dir() {
        tracing::warn!(
            "public directory does not exist: {}",
            rest_cfg.public_dir().display()
        );
    }

    let store = core_cfg.open_store()?;
    let documents = DocumentService::new(store);
    let app = api_rest::build_router(documents, &rest_cfg);

    tracing::info!("++ Starting Quill REST on {}", rest_cfg.addr());
    let listener = tokio::net::TcpListener::bind(rest_cfg.addr()).await?;
    api_rest::serve(listener, app).await?;

    Ok(())
}
