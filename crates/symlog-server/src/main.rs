mod config;

use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use symlog_api::AppStateInner;
use symlog_db::Database;
use symlog_gateway::ChatCompletionClient;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "symlog=debug,symlog_api=debug,symlog_db=debug,symlog_gateway=debug,tower_http=debug"
                    .into()
            }),
        )
        .init();

    // Refuses to start without the gateway key
    let config = Config::from_env()?;

    let db = Database::new(&config.db_path);
    db.ensure_schema()?;

    info!(model = %config.gateway.model, endpoint = %config.gateway.endpoint, "Gateway configured");
    let gateway = ChatCompletionClient::new(config.gateway.clone())?;

    let state = Arc::new(AppStateInner {
        db,
        gateway: Arc::new(gateway),
    });

    let app = symlog_api::router(state)
        .merge(symlog_api::pages::router(&config.template_dir, &config.static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = bind(&config).await?;
    info!("symlog listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

// Host may be an IP or a name such as localhost
async fn bind(config: &Config) -> std::io::Result<TcpListener> {
    TcpListener::bind((config.host.as_str(), config.port)).await
}
