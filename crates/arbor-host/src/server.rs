//! Web server setup and routing

use anyhow::Result;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::{HostConfig, STATIC_PREFIX};

/// Routes: `/static/**` from the static tree, everything else (including
/// `/` -> index.html and the wasm bundle) from the web directory
pub fn router(config: &HostConfig) -> Router {
    Router::new()
        .nest_service(
            &format!("/{}", STATIC_PREFIX),
            ServeDir::new(&config.server.static_dir),
        )
        .fallback_service(ServeDir::new(&config.server.web_dir))
        // The page may be opened from another origin during development
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Run the web server until it fails
pub async fn run(config: &HostConfig) -> Result<()> {
    let app = router(config);
    let bind = &config.server.bind;

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(
        address = %bind,
        web_dir = %config.server.web_dir.display(),
        static_dir = %config.server.static_dir.display(),
        "Starting web server"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
