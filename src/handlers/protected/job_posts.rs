use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::database::models::JobPost;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// POST /jobposts - create a post owned by the session's user
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<JobPost>)> {
    let Json(body) = payload?;
    let post = state.job_posts.create(user.user_id, body).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /jobposts/:id - apply a partial update
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<JobPost>> {
    let Json(body) = payload?;
    let post = state.job_posts.update(user.user_id, &id, body).await?;
    Ok(Json(post))
}

/// DELETE /jobposts/:id - soft delete
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.job_posts.soft_delete(user.user_id, &id).await?;
    Ok(Json(json!({ "message": "Job marked as deleted." })))
}

/// POST /jobposts/restore/:id - undo a soft delete
pub async fn restore(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.job_posts.restore(user.user_id, &id).await?;
    Ok(Json(json!({ "message": "Job restored." })))
}
