pub mod auth;
pub mod community;
pub mod emergency;
pub mod error;
pub mod pages;
pub mod prompt;
pub mod query;
pub mod symptoms;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    routing::{delete, get, post},
};
use tracing::error;

use symlog_db::Database;
use symlog_gateway::Completion;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub gateway: Arc<dyn Completion>,
}

/// All `/api` routes. Static files and layers are added by the server.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/query", post(query::query_model))
        .route("/api/symptoms/list", get(symptoms::list_symptoms))
        .route("/api/symptoms/add", post(symptoms::add_symptom))
        .route("/api/symptoms/delete/{id}", delete(symptoms::delete_symptom))
        .route("/api/symptoms/analyze", post(symptoms::analyze_symptoms))
        .route("/api/symptoms/export", get(symptoms::export_symptoms))
        .route("/api/community/register", post(auth::register))
        .route("/api/community/login", post(auth::login))
        .route(
            "/api/community/posts",
            get(community::list_posts).post(community::create_post),
        )
        .route("/api/community/posts/{id}", get(community::get_post))
        .route(
            "/api/community/posts/{id}/comments",
            get(community::list_comments).post(community::create_comment),
        )
        .with_state(state)
}

/// Run blocking SQLite work off the async runtime.
pub(crate) async fn run_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = state.db.clone();
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.into())
        })?
        .map_err(ApiError::Internal)
}

pub(crate) type JsonBody<T> = Result<Json<T>, JsonRejection>;

/// Unwrap a handler's JSON body. A request that is not labelled as JSON
/// reads as `{}` and meets the handler's own required-field checks; a JSON
/// body that fails to parse or has wrongly typed fields is a 400.
pub(crate) fn json_body<T: Default>(payload: JsonBody<T>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(ApiError::InvalidBody(rejection)),
    }
}
