use crate::error::{ApiError, MessageResponse};
use crate::models::{AuthorView, author_name, to_author_view};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};

/// GET /blog/author handler - Author of the store's first post
#[utoipa::path(
    get,
    path = routes::BLOG_AUTHOR,
    responses(
        (status = 200, description = "Author of the first blog post", body = AuthorView),
        (status = 204, description = "No blog posts stored", body = MessageResponse),
        (status = 500, description = "Database error", body = MessageResponse)
    ),
    tag = "blog"
)]
pub async fn author_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<AuthorView>), ApiError> {
    let post = state.store.find_one().await?.ok_or(ApiError::Empty)?;

    tracing::info!("First post {} written by {}", post.id, author_name(&post.author));
    Ok((StatusCode::OK, Json(to_author_view(&post))))
}

#[cfg(test)]
mod tests {
    use crate::models::AuthorView;
    use crate::test_support::{create_post, send, setup_test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_author_endpoint_returns_first_post() {
        let (app, _store) = setup_test_app().await;
        let first = create_post(&app, "first").await;
        create_post(&app, "second").await;

        let (status, body) = send(&app, "GET", "/blog/author", None).await;
        assert_eq!(status, StatusCode::OK);

        let view: AuthorView = serde_json::from_slice(&body).unwrap();
        assert_eq!(view.id, first["id"].as_str().unwrap());
        assert_eq!(view.author, "Donald Duck");
    }

    #[tokio::test]
    async fn test_author_endpoint_empty_store() {
        let (app, _store) = setup_test_app().await;

        let (status, _body) = send(&app, "GET", "/blog/author", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
