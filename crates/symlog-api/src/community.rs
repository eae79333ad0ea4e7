use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

use symlog_types::api::{
    CreateCommentRequest, CreateCommentResponse, CreatePostRequest, CreatePostResponse,
    PostDetailResponse,
};
use symlog_types::models::{Comment, PostSummary};

use crate::error::ApiError;
use crate::{AppState, JsonBody, json_body, run_db};

/// GET /api/community/posts
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostSummary>>, ApiError> {
    let posts = run_db(&state, |db| db.list_posts()).await?;
    Ok(Json(posts))
}

/// POST /api/community/posts — a missing or non-positive `user_id` posts anonymously.
pub async fn create_post(
    State(state): State<AppState>,
    payload: JsonBody<CreatePostRequest>,
) -> Result<Json<CreatePostResponse>, ApiError> {
    let req = json_body(payload)?;
    let content = req.content();
    if content.is_empty() {
        return Err(ApiError::Validation("content required"));
    }
    let user_id = req.user_id();

    let post = run_db(&state, move |db| {
        let id = db.insert_post(user_id, &content)?;
        db.get_post(id)?
            .ok_or_else(|| anyhow!("Post {} missing right after insert", id))
    })
    .await?;

    info!(post_id = post.id, user_id = ?post.user_id, "Post created");
    Ok(Json(CreatePostResponse {
        success: true,
        post,
    }))
}

/// GET /api/community/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostDetailResponse>, ApiError> {
    let (post, comments) = run_db(&state, move |db| {
        let post = db.get_post(post_id)?;
        let comments = db.list_comments(post_id)?;
        Ok((post, comments))
    })
    .await?;

    let post = post.ok_or(ApiError::NotFound("post not found"))?;
    Ok(Json(PostDetailResponse { post, comments }))
}

/// GET /api/community/posts/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = run_db(&state, move |db| db.list_comments(post_id)).await?;
    Ok(Json(comments))
}

/// POST /api/community/posts/{id}/comments
///
/// The post is not looked up first; comments on unknown ids are stored as-is.
pub async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    payload: JsonBody<CreateCommentRequest>,
) -> Result<Json<CreateCommentResponse>, ApiError> {
    let req = json_body(payload)?;
    let content = req.content();
    if content.is_empty() {
        return Err(ApiError::Validation("content required"));
    }
    let user_id = req.user_id();

    let comment = run_db(&state, move |db| {
        let id = db.insert_comment(post_id, user_id, &content)?;
        db.get_comment(id)?
            .ok_or_else(|| anyhow!("Comment {} missing right after insert", id))
    })
    .await?;

    info!(comment_id = comment.id, post_id, "Comment created");
    Ok(Json(CreateCommentResponse {
        success: true,
        comment,
    }))
}
