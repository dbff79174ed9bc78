use crate::error::{ApiError, MessageResponse};
use crate::models::{FullView, to_full_view};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};

/// GET /blog handler - List blog posts
///
/// Returns at most ten posts in the store's natural order.
#[utoipa::path(
    get,
    path = routes::BLOG_LIST,
    responses(
        (status = 200, description = "List of blog posts", body = [FullView]),
        (status = 500, description = "Database error", body = MessageResponse)
    ),
    tag = "blog"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<FullView>>), ApiError> {
    let posts = state.store.find_all(routes::LIST_LIMIT).await?;

    let views: Vec<FullView> = posts.iter().map(to_full_view).collect();
    tracing::info!("Listed {} posts", views.len());

    Ok((StatusCode::OK, Json(views)))
}
