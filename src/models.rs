use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a blog post; either name part may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A blog post as held by the document store
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: Author,
    pub created: DateTime<Utc>,
}

/// Fields supplied when creating a post. The store assigns `id` and `created`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlogPost {
    pub title: String,
    pub content: String,
    pub author: Author,
}

/// Partial update; `None` leaves the stored field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<Author>,
}

impl BlogPostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.author.is_none()
    }

    /// Apply the present fields onto `post`
    pub fn apply_to(&self, post: &mut BlogPost) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(author) = &self.author {
            post.author = author.clone();
        }
    }
}

/// Request body for POST /blog
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<Author>,
}

/// Request body for PUT /blog/{id}
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateBlogRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<Author>,
}

impl UpdateBlogRequest {
    pub fn into_patch(self) -> BlogPostPatch {
        BlogPostPatch {
            title: self.title,
            content: self.content,
            author: self.author,
        }
    }
}

/// Externally visible representation of a post
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FullView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created: DateTime<Utc>,
}

/// Reduced representation carrying only the author's display name
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthorView {
    pub id: String,
    pub author: String,
}

/// Render an author as "first last". Missing parts render empty.
pub fn author_name(author: &Author) -> String {
    format!(
        "{} {}",
        author.first_name.as_deref().unwrap_or_default(),
        author.last_name.as_deref().unwrap_or_default()
    )
}

pub fn to_full_view(post: &BlogPost) -> FullView {
    FullView {
        id: post.id.clone(),
        title: post.title.clone(),
        content: post.content.clone(),
        author: author_name(&post.author),
        created: post.created,
    }
}

pub fn to_author_view(post: &BlogPost) -> AuthorView {
    AuthorView {
        id: post.id.clone(),
        author: author_name(&post.author),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> BlogPost {
        BlogPost {
            id: "abc".to_string(),
            title: "title-1".to_string(),
            content: "content-1".to_string(),
            author: Author {
                first_name: Some("Donald".to_string()),
                last_name: Some("Duck".to_string()),
            },
            created: Utc::now(),
        }
    }

    #[test]
    fn test_full_view_renders_author_name() {
        let post = sample_post();
        let view = to_full_view(&post);

        assert_eq!(view.id, "abc");
        assert_eq!(view.title, "title-1");
        assert_eq!(view.content, "content-1");
        assert_eq!(view.author, "Donald Duck");
        assert_eq!(view.created, post.created);
    }

    #[test]
    fn test_author_view() {
        let view = to_author_view(&sample_post());
        assert_eq!(view.id, "abc");
        assert_eq!(view.author, "Donald Duck");
    }

    #[test]
    fn test_author_name_with_missing_parts() {
        let only_first = Author {
            first_name: Some("Donald".to_string()),
            last_name: None,
        };
        assert_eq!(author_name(&only_first), "Donald ");
        assert_eq!(author_name(&Author::default()), " ");
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut post = sample_post();
        let created = post.created;
        let patch = BlogPostPatch {
            title: Some("new title".to_string()),
            ..Default::default()
        };

        patch.apply_to(&mut post);

        assert_eq!(post.title, "new title");
        assert_eq!(post.content, "content-1");
        assert_eq!(author_name(&post.author), "Donald Duck");
        assert_eq!(post.created, created);
    }

    #[test]
    fn test_full_view_json_shape() {
        let json = serde_json::to_value(to_full_view(&sample_post())).unwrap();
        let object = json.as_object().unwrap();
        for key in ["id", "title", "content", "author", "created"] {
            assert!(object.contains_key(key), "missing key {}", key);
        }
        assert_eq!(object.len(), 5);
    }

    #[test]
    fn test_author_deserializes_camel_case() {
        let author: Author =
            serde_json::from_str(r#"{"firstName": "Donald", "lastName": "Duck"}"#).unwrap();
        assert_eq!(author.first_name.as_deref(), Some("Donald"));
        assert_eq!(author.last_name.as_deref(), Some("Duck"));
    }
}
