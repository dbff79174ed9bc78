use crate::error::{ApiError, MessageResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode};

/// DELETE /blog/{id} handler - Remove a blog post
///
/// Answers 204 whether or not the post existed.
#[utoipa::path(
    delete,
    path = routes::BLOG_ITEM,
    params(
        ("id" = String, Path, description = "Id of the blog post")
    ),
    responses(
        (status = 204, description = "Blog post removed"),
        (status = 500, description = "Database error", body = MessageResponse)
    ),
    tag = "blog"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_by_id(&id).await?;

    tracing::info!("Deleted post with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
