use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};

use crate::database::models::JobPost;
use crate::error::ApiResult;
use crate::filter::SearchParams;
use crate::state::AppState;

/// GET /jobposts?searchTerm=&locationTerm= - live posts, optionally filtered
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<Vec<JobPost>>> {
    let Query(params) = query?;
    let posts = state.job_posts.list(&params).await?;
    Ok(Json(posts))
}

/// GET /jobposts/:id - single post, including soft-deleted ones
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<JobPost>> {
    let post = state.job_posts.get(&id).await?;
    Ok(Json(post))
}
