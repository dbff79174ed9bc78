use crate::error::{ApiError, MessageResponse};
use crate::models::{FullView, UpdateBlogRequest, to_full_view};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::Path, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use serde_json::Value as JsonValue;

/// PUT /blog/{id} handler - Partially update a blog post
///
/// The body must repeat the path id. Only `title`, `content` and `author`
/// are written; absent fields keep their stored values.
#[utoipa::path(
    put,
    path = routes::BLOG_ITEM,
    params(
        ("id" = String, Path, description = "Id of the blog post")
    ),
    request_body = UpdateBlogRequest,
    responses(
        (status = 201, description = "Blog post updated", body = FullView),
        (status = 204, description = "Blog post not found", body = MessageResponse),
        (status = 400, description = "Body id missing or different from path id", body = String),
        (status = 500, description = "Database error", body = MessageResponse)
    ),
    tag = "blog"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<(StatusCode, Json<FullView>), ApiError> {
    let Json(body) = body?;
    let request: UpdateBlogRequest = serde_json::from_value(body)?;

    if request.id.as_deref() != Some(id.as_str()) {
        return Err(ApiError::IdMismatch {
            path_id: id,
            body_id: request.id,
        });
    }

    tracing::info!("Updating post with id: {}", id);
    match state.store.update_by_id(&id, request.into_patch()).await? {
        Some(post) => Ok((StatusCode::CREATED, Json(to_full_view(&post)))),
        None => {
            tracing::info!("Post not found with id: {}", id);
            Err(ApiError::NotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{FullView, to_full_view};
    use crate::test_support::{create_post, send, setup_test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_update_endpoint_partial() {
        let (app, store) = setup_test_app().await;
        let created = create_post(&app, "original").await;
        let id = created["id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/blog/{}", id),
            Some(json!({"id": id, "title": "renamed"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let view: FullView = serde_json::from_slice(&body).unwrap();
        assert_eq!(view.title, "renamed");
        assert_eq!(view.content, created["content"]);
        assert_eq!(view.author, "Donald Duck");
        assert_eq!(json!(view.created), created["created"]);

        let stored = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(to_full_view(&stored).title, "renamed");
    }

    #[tokio::test]
    async fn test_update_endpoint_ignores_created() {
        let (app, store) = setup_test_app().await;
        let created = create_post(&app, "dated").await;
        let id = created["id"].as_str().unwrap();
        let original = store.find_by_id(id).await.unwrap().unwrap().created;

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/blog/{}", id),
            Some(json!({"id": id, "created": "2000-01-01T00:00:00Z", "title": "t"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let view: FullView = serde_json::from_slice(&body).unwrap();
        assert_eq!(view.title, "t");
        assert_eq!(view.created, original);
        assert_eq!(json!(view.created), created["created"]);

        let stored = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.created, original);
    }

    #[tokio::test]
    async fn test_update_endpoint_author() {
        let (app, _store) = setup_test_app().await;
        let created = create_post(&app, "authored").await;
        let id = created["id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/blog/{}", id),
            Some(json!({"id": id, "author": {"firstName": "Daisy", "lastName": "Duck"}})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let view: FullView = serde_json::from_slice(&body).unwrap();
        assert_eq!(view.author, "Daisy Duck");
        assert_eq!(view.title, "authored");
    }

    #[tokio::test]
    async fn test_update_endpoint_id_mismatch_does_not_mutate() {
        let (app, store) = setup_test_app().await;
        let created = create_post(&app, "untouched").await;
        let id = created["id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/blog/{}", id),
            Some(json!({"id": "someone-else", "title": "hijacked"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(String::from_utf8(body).unwrap().contains("must match"));

        let (status, _body) = send(
            &app,
            "PUT",
            &format!("/blog/{}", id),
            Some(json!({"title": "hijacked"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let stored = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.title, "untouched");
    }

    #[tokio::test]
    async fn test_update_endpoint_unknown_id() {
        let (app, _store) = setup_test_app().await;

        let (status, _body) = send(
            &app,
            "PUT",
            "/blog/missing",
            Some(json!({"id": "missing", "title": "t"})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
