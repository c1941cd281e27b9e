use dotenv::dotenv;
use forum_api::config::LogFormat;
use forum_api::{ApiConfig, Dependencies, StartupError, router};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("forum_api=info,forum_voting=info,forum_repository=info")
    });

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
                .init();
        }
    }

    info!(
        service_name = "forum-api",
        service_version = env!("CARGO_PKG_VERSION"),
        log_format = ?format,
        "Tracing initialized"
    );
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down...");
}

/// Main entry point for the Forum API.
///
/// Loads `.env`, reads the configuration, wires the dependencies and serves
/// the HTTP routes until ctrl-c.
#[tokio::main]
async fn main() -> Result<(), StartupError> {
    dotenv().ok();

    let config = ApiConfig::from_env()?;
    init_tracing(config.log_format);

    let dependencies = match Dependencies::new(config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let app = router(
        dependencies.state.clone(),
        &dependencies.config.cors_allowed_origins,
    )?;

    let addr = dependencies.config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Forum API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    dependencies.pool.close().await;
    Ok(())
}
