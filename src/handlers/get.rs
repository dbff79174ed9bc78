use crate::error::{ApiError, MessageResponse};
use crate::models::{FullView, to_full_view};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::Path, extract::State, http::StatusCode};

/// GET /blog/{id} handler - Retrieve one blog post
///
/// A missing post answers 204 with a message body rather than 404.
#[utoipa::path(
    get,
    path = routes::BLOG_ITEM,
    params(
        ("id" = String, Path, description = "Id of the blog post")
    ),
    responses(
        (status = 200, description = "Blog post found", body = FullView),
        (status = 204, description = "Blog post not found", body = MessageResponse),
        (status = 500, description = "Database error", body = MessageResponse)
    ),
    tag = "blog"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<FullView>), ApiError> {
    match state.store.find_by_id(&id).await? {
        Some(post) => {
            tracing::info!("Successfully retrieved post with id: {}", id);
            Ok((StatusCode::OK, Json(to_full_view(&post))))
        }
        None => {
            tracing::info!("Post not found with id: {}", id);
            Err(ApiError::NotFound(id))
        }
    }
}
