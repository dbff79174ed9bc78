//! In-process document store, used for tests and local runs without Spanner.
//! Data is lost when the process exits.

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::DocumentStore;
use crate::models::{BlogPost, BlogPostPatch, NewBlogPost};

/// Posts kept in insertion order behind an async RwLock
pub struct MemoryStore {
    posts: RwLock<Vec<BlogPost>>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            bail!("Document store connection is closed");
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, post: NewBlogPost) -> Result<BlogPost> {
        self.ensure_open()?;

        let post = BlogPost {
            id: Uuid::new_v4().to_string(),
            title: post.title,
            content: post.content,
            author: post.author,
            created: Utc::now(),
        };

        self.posts.write().await.push(post.clone());
        tracing::debug!("Inserted post with id: {}", post.id);
        Ok(post)
    }

    async fn find_all(&self, limit: i64) -> Result<Vec<BlogPost>> {
        self.ensure_open()?;

        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        let posts = self.posts.read().await;
        Ok(posts.iter().take(limit).cloned().collect())
    }

    async fn find_one(&self) -> Result<Option<BlogPost>> {
        self.ensure_open()?;
        Ok(self.posts.read().await.first().cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BlogPost>> {
        self.ensure_open()?;

        let posts = self.posts.read().await;
        Ok(posts.iter().find(|post| post.id == id).cloned())
    }

    async fn update_by_id(&self, id: &str, patch: BlogPostPatch) -> Result<Option<BlogPost>> {
        self.ensure_open()?;

        let mut posts = self.posts.write().await;
        match posts.iter_mut().find(|post| post.id == id) {
            Some(post) => {
                patch.apply_to(post);
                tracing::debug!("Updated post with id: {}", id);
                Ok(Some(post.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.ensure_open()?;

        self.posts.write().await.retain(|post| post.id != id);
        tracing::debug!("Deleted post with id: {}", id);
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        self.ensure_open()?;
        Ok(self.posts.read().await.len() as i64)
    }

    async fn health_check(&self) -> Result<()> {
        self.ensure_open()
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::info!("In-memory document store closed");
        }
    }
}
