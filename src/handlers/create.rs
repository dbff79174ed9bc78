use crate::error::{ApiError, MessageResponse};
use crate::models::{CreateBlogRequest, FullView, NewBlogPost, to_full_view};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use serde_json::Value as JsonValue;

/// POST /blog handler - Create a blog post
///
/// `title`, `content` and `author` are checked in that order and the first
/// missing one is reported.
#[utoipa::path(
    post,
    path = routes::BLOG_LIST,
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Blog post created", body = FullView),
        (status = 400, description = "Missing field or invalid JSON", body = String),
        (status = 500, description = "Database error", body = MessageResponse)
    ),
    tag = "blog"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<(StatusCode, Json<FullView>), ApiError> {
    let Json(body) = body?;
    let request: CreateBlogRequest = serde_json::from_value(body)?;

    let title = required_text(request.title, "title")?;
    let content = required_text(request.content, "content")?;
    let author = request.author.ok_or(ApiError::MissingField("author"))?;

    let post = state
        .store
        .insert(NewBlogPost {
            title,
            content,
            author,
        })
        .await?;

    tracing::info!("Created post with id: {}", post.id);
    Ok((StatusCode::CREATED, Json(to_full_view(&post))))
}

/// Present and non-empty, otherwise reported as missing
fn required_text(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    match value {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ApiError::MissingField(field)),
    }
}
