// ABOUTME: The content store: posts, gallery items, and their queries.
// ABOUTME: One trait, one in-memory implementation shared by every route.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use mpl_core::LabEntity;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content store lock poisoned")]
    Poisoned,
}

/// A blog post. Serialized field names follow the public API's
/// camelCase convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub slug: String,
    pub featured: bool,
    pub published: bool,
    pub entity_id: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub featured: bool,
    pub tags: Vec<String>,
    pub entity_id: String,
    pub created_at: DateTime<Utc>,
}

/// Client-supplied fields for a new post. Everything the server owns
/// (id, timestamps, defaulted entity) is filled in on insert.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub entity_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGalleryItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub entity_id: Option<String>,
}

/// Post list filter. All supplied predicates must hold.
#[derive(Debug, Clone)]
pub struct PostQuery {
    /// When true, only featured posts
    pub featured: bool,
    pub published: bool,
    pub entity_id: Option<String>,
    pub limit: usize,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            featured: false,
            published: true,
            entity_id: None,
            limit: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GalleryQuery {
    pub featured: bool,
    pub kind: Option<String>,
    pub entity_id: Option<String>,
    pub limit: usize,
}

impl Default for GalleryQuery {
    fn default() -> Self {
        Self {
            featured: false,
            kind: None,
            entity_id: None,
            limit: 20,
        }
    }
}

/// Persistence seam for site content. The site runs entirely on
/// [`MemoryStore`]; the trait keeps the routes and pages ignorant of it.
pub trait ContentStore: Send + Sync {
    fn posts(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError>;
    fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError>;
    fn insert_post(&self, new: NewPost) -> Result<Post, StoreError>;
    fn gallery(&self, query: &GalleryQuery) -> Result<Vec<GalleryItem>, StoreError>;
    fn insert_gallery_item(&self, new: NewGalleryItem) -> Result<GalleryItem, StoreError>;
}

/// In-memory backing arrays, rebuilt from seed data at startup.
#[derive(Default)]
pub struct MemoryStore {
    posts: RwLock<Vec<Post>>,
    gallery: RwLock<Vec<GalleryItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(posts: Vec<Post>, gallery: Vec<GalleryItem>) -> Self {
        Self {
            posts: RwLock::new(posts),
            gallery: RwLock::new(gallery),
        }
    }
}

/// Owning entity for new content: explicit id wins, then tag expertise,
/// then the seeded hash of the slug or title.
fn default_entity(explicit: Option<&str>, seed: &str, tags: &[String]) -> String {
    match explicit {
        Some(id) => id.to_string(),
        None => LabEntity::assign(seed, tags).id.to_string(),
    }
}

impl ContentStore for MemoryStore {
    fn posts(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().map_err(|_| StoreError::Poisoned)?;
        let mut matched: Vec<Post> = posts
            .iter()
            .filter(|p| !query.featured || p.featured)
            .filter(|p| p.published == query.published)
            .filter(|p| {
                query
                    .entity_id
                    .as_deref()
                    .is_none_or(|id| p.entity_id == id)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.truncate(query.limit);
        Ok(matched)
    }

    fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let posts = self.posts.read().map_err(|_| StoreError::Poisoned)?;
        Ok(posts.iter().find(|p| p.slug == slug).cloned())
    }

    fn insert_post(&self, new: NewPost) -> Result<Post, StoreError> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4().to_string(),
            entity_id: default_entity(new.entity_id.as_deref(), &new.slug, &new.tags),
            title: new.title,
            content: new.content,
            excerpt: new.excerpt,
            slug: new.slug,
            featured: new.featured,
            published: new.published,
            tags: new.tags,
            created_at: now,
            updated_at: now,
        };
        let mut posts = self.posts.write().map_err(|_| StoreError::Poisoned)?;
        posts.push(post.clone());
        Ok(post)
    }

    fn gallery(&self, query: &GalleryQuery) -> Result<Vec<GalleryItem>, StoreError> {
        let items = self.gallery.read().map_err(|_| StoreError::Poisoned)?;
        let mut matched: Vec<GalleryItem> = items
            .iter()
            .filter(|i| !query.featured || i.featured)
            .filter(|i| query.kind.as_deref().is_none_or(|k| i.kind == k))
            .filter(|i| {
                query
                    .entity_id
                    .as_deref()
                    .is_none_or(|id| i.entity_id == id)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.truncate(query.limit);
        Ok(matched)
    }

    fn insert_gallery_item(&self, new: NewGalleryItem) -> Result<GalleryItem, StoreError> {
        let item = GalleryItem {
            id: Uuid::new_v4().to_string(),
            entity_id: default_entity(new.entity_id.as_deref(), &new.title, &new.tags),
            title: new.title,
            description: new.description,
            image_url: new.image_url,
            video_url: new.video_url,
            kind: new.kind,
            featured: new.featured,
            tags: new.tags,
            created_at: Utc::now(),
        };
        let mut items = self.gallery.write().map_err(|_| StoreError::Poisoned)?;
        items.push(item.clone());
        Ok(item)
    }
}
