// Route path constants - single source of truth for all API paths

pub const HEALTH: &str = "/health";
pub const BLOG_LIST: &str = "/blog";
pub const BLOG_AUTHOR: &str = "/blog/author";
pub const BLOG_ITEM: &str = "/blog/{id}";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Maximum number of posts returned by the list endpoint
pub const LIST_LIMIT: i64 = 10;
