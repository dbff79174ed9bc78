pub mod memory;
pub mod spanner;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;

use crate::models::{BlogPost, BlogPostPatch, NewBlogPost};

pub use memory::MemoryStore;
pub use spanner::SpannerStore;

/// Persistence backend for blog posts.
///
/// Every operation is a single independent call; there is no cross-call
/// transaction, so concurrent updates to one post are last-writer-wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a post, assigning its `id` and `created` timestamp
    async fn insert(&self, post: NewBlogPost) -> Result<BlogPost>;

    /// Return at most `limit` posts in the store's natural order
    async fn find_all(&self, limit: i64) -> Result<Vec<BlogPost>>;

    /// Return the store's first post, if any
    async fn find_one(&self) -> Result<Option<BlogPost>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<BlogPost>>;

    /// Overwrite only the fields present in `patch`.
    ///
    /// Returns the updated post, or `None` when no post has this id.
    async fn update_by_id(&self, id: &str, patch: BlogPostPatch) -> Result<Option<BlogPost>>;

    /// Remove a post. Deleting an unknown id is not an error.
    async fn delete_by_id(&self, id: &str) -> Result<()>;

    async fn count(&self) -> Result<i64>;

    /// Lightweight round trip used by the health endpoint
    async fn health_check(&self) -> Result<()>;

    /// Release the connection. Safe to call more than once.
    async fn close(&self);
}

/// Shared store handle injected into the HTTP layer
pub type Store = Arc<dyn DocumentStore>;

/// Fully qualified Spanner database coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannerDatabase {
    pub project: String,
    pub instance: String,
    pub database: String,
}

impl SpannerDatabase {
    pub fn project_path(&self) -> String {
        format!("projects/{}", self.project)
    }

    pub fn instance_path(&self) -> String {
        format!("{}/instances/{}", self.project_path(), self.instance)
    }

    pub fn database_path(&self) -> String {
        format!("{}/databases/{}", self.instance_path(), self.database)
    }
}

/// Parsed store address.
///
/// Accepted forms:
/// - `memory` or `memory://<name>` for the in-process store
/// - `projects/{p}/instances/{i}/databases/{d}`, optionally prefixed with `spanner://`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    Memory,
    Spanner(SpannerDatabase),
}

impl FromStr for DatabaseUrl {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "memory" || s.starts_with("memory://") {
            return Ok(DatabaseUrl::Memory);
        }

        let path = s.strip_prefix("spanner://").unwrap_or(s);
        let parts: Vec<&str> = path.split('/').collect();
        match parts.as_slice() {
            ["projects", project, "instances", instance, "databases", database]
                if !project.is_empty() && !instance.is_empty() && !database.is_empty() =>
            {
                Ok(DatabaseUrl::Spanner(SpannerDatabase {
                    project: project.to_string(),
                    instance: instance.to_string(),
                    database: database.to_string(),
                }))
            }
            _ => bail!(
                "Unsupported database URL '{}': expected 'memory://<name>' or 'projects/<project>/instances/<instance>/databases/<database>'",
                s
            ),
        }
    }
}

/// Open a store for the given address
pub async fn connect(database_url: &str) -> Result<Store> {
    let url: DatabaseUrl = database_url
        .parse()
        .context("Failed to parse database URL")?;

    match url {
        DatabaseUrl::Memory => {
            tracing::info!("Using in-memory document store");
            Ok(Arc::new(MemoryStore::new()))
        }
        DatabaseUrl::Spanner(database) => {
            let store = SpannerStore::connect(&database).await?;
            Ok(Arc::new(store))
        }
    }
}
