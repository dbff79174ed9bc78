use utoipa::OpenApi;

use crate::error::{HealthResponse, MessageResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{Author, AuthorView, CreateBlogRequest, FullView, UpdateBlogRequest};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "rust-spanner-blog API",
        version = "1.0.0",
        description = "A minimal blog CRUD service backed by a document store"
    ),
    paths(
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::get::get_handler,
        handlers::author::author_handler,
        handlers::create::create_handler,
        handlers::update::update_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            Author,
            FullView,
            AuthorView,
            CreateBlogRequest,
            UpdateBlogRequest,
            MessageResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "blog", description = "Blog post operations")
    )
)]
pub struct ApiDoc;
