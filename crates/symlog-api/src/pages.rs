use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

/// Browser front end: the three HTML pages plus their scripts under `/static`.
pub fn router(template_dir: &Path, static_dir: &Path) -> Router {
    info!(templates = ?template_dir, static_dir = ?static_dir, "Serving front end");

    Router::new()
        .route_service("/", ServeFile::new(template_dir.join("index.html")))
        .route_service("/symptoms", ServeFile::new(template_dir.join("symptoms.html")))
        .route_service("/community", ServeFile::new(template_dir.join("community.html")))
        .nest_service("/static", ServeDir::new(static_dir))
}
