// ABOUTME: Mock REST handlers for /api/posts and /api/gallery.
// ABOUTME: Pure functions over the store; the HTTP layer just forwards.

use serde_json::{json, Value};

use crate::store::{ContentStore, GalleryQuery, NewGalleryItem, NewPost, PostQuery};

/// Transport-agnostic handler result.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn created(body: Value) -> Self {
        Self { status: 201, body }
    }

    fn bad_request(message: &str) -> Self {
        Self {
            status: 400,
            body: json!({ "error": message }),
        }
    }

    fn server_error(message: &str) -> Self {
        Self {
            status: 500,
            body: json!({ "error": message }),
        }
    }
}

/// Decode an `application/x-www-form-urlencoded` style query string
/// into key/value pairs. Keys without `=` get an empty value.
fn parse_pairs(raw_query: &str) -> Vec<(String, String)> {
    raw_query
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            (
                urlencoding::decode(key).map(|k| k.into_owned()).unwrap_or_default(),
                urlencoding::decode(value).map(|v| v.into_owned()).unwrap_or_default(),
            )
        })
        .collect()
}

fn parse_limit(value: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| format!("invalid limit: {value}"))
}

fn parse_post_query(raw_query: &str) -> Result<PostQuery, String> {
    let mut query = PostQuery::default();
    for (key, value) in parse_pairs(raw_query) {
        match key.as_str() {
            "featured" => query.featured = value == "true",
            // Published unless explicitly asked for drafts
            "published" => query.published = value != "false",
            "entityId" => query.entity_id = Some(value),
            "limit" => query.limit = parse_limit(&value)?,
            _ => {}
        }
    }
    Ok(query)
}

fn parse_gallery_query(raw_query: &str) -> Result<GalleryQuery, String> {
    let mut query = GalleryQuery::default();
    for (key, value) in parse_pairs(raw_query) {
        match key.as_str() {
            "featured" => query.featured = value == "true",
            "type" => query.kind = Some(value),
            "entityId" => query.entity_id = Some(value),
            "limit" => query.limit = parse_limit(&value)?,
            _ => {}
        }
    }
    Ok(query)
}

pub fn get_posts(store: &dyn ContentStore, raw_query: &str) -> ApiResponse {
    let query = match parse_post_query(raw_query) {
        Ok(query) => query,
        Err(message) => return ApiResponse::bad_request(&message),
    };
    match store.posts(&query) {
        Ok(posts) => ApiResponse::ok(json!(posts)),
        Err(err) => {
            tracing::error!(%err, "error fetching posts");
            ApiResponse::server_error("Failed to fetch posts")
        }
    }
}

pub fn create_post(store: &dyn ContentStore, body: &str) -> ApiResponse {
    let new: NewPost = match serde_json::from_str(body) {
        Ok(new) => new,
        Err(err) => return ApiResponse::bad_request(&format!("invalid post body: {err}")),
    };
    match store.insert_post(new) {
        Ok(post) => ApiResponse::created(json!(post)),
        Err(err) => {
            tracing::error!(%err, "error creating post");
            ApiResponse::server_error("Failed to create post")
        }
    }
}

pub fn get_gallery(store: &dyn ContentStore, raw_query: &str) -> ApiResponse {
    let query = match parse_gallery_query(raw_query) {
        Ok(query) => query,
        Err(message) => return ApiResponse::bad_request(&message),
    };
    match store.gallery(&query) {
        Ok(items) => ApiResponse::ok(json!(items)),
        Err(err) => {
            tracing::error!(%err, "error fetching gallery items");
            ApiResponse::server_error("Failed to fetch gallery items")
        }
    }
}

pub fn create_gallery_item(store: &dyn ContentStore, body: &str) -> ApiResponse {
    let new: NewGalleryItem = match serde_json::from_str(body) {
        Ok(new) => new,
        Err(err) => return ApiResponse::bad_request(&format!("invalid gallery body: {err}")),
    };
    match store.insert_gallery_item(new) {
        Ok(item) => ApiResponse::created(json!(item)),
        Err(err) => {
            tracing::error!(%err, "error creating gallery item");
            ApiResponse::server_error("Failed to create gallery item")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_get_posts_defaults() {
        let store = seed::store();
        let response = get_posts(&store, "");
        assert_eq!(response.status, 200);
        let posts = response.body.as_array().unwrap();
        assert!(posts.len() <= 10);
        assert!(posts.iter().all(|p| p["published"] == true));
    }

    #[test]
    fn test_get_posts_drafts() {
        let store = seed::store();
        let response = get_posts(&store, "published=false");
        let posts = response.body.as_array().unwrap();
        assert!(!posts.is_empty());
        assert!(posts.iter().all(|p| p["published"] == false));
    }

    #[test]
    fn test_featured_limit_one() {
        let store = seed::store();
        let response = get_gallery(&store, "featured=true&limit=1");
        assert_eq!(response.status, 200);
        let items = response.body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["featured"], true);
    }

    #[test]
    fn test_gallery_type_filter() {
        let store = seed::store();
        let response = get_gallery(&store, "type=video");
        let items = response.body.as_array().unwrap();
        assert!(!items.is_empty());
        assert!(items.iter().all(|i| i["type"] == "video"));
    }

    #[test]
    fn test_bad_limit_is_rejected() {
        let store = seed::store();
        let response = get_posts(&store, "limit=banana");
        assert_eq!(response.status, 400);
        assert!(response.body["error"].is_string());
    }

    #[test]
    fn test_create_post_then_visible() {
        let store = seed::store();
        let body = r#"{"title":"New","content":"...","slug":"new-post","published":true}"#;
        let response = create_post(&store, body);
        assert_eq!(response.status, 201);
        assert!(response.body["id"].is_string());
        assert!(response.body["entityId"].is_string());
        assert!(response.body["createdAt"].is_string());

        let listed = get_posts(&store, "limit=50");
        let posts = listed.body.as_array().unwrap();
        assert!(posts.iter().any(|p| p["slug"] == "new-post"));
    }

    #[test]
    fn test_create_post_malformed_body() {
        let store = seed::store();
        let response = create_post(&store, "{not json");
        assert_eq!(response.status, 400);
    }

    #[test]
    fn test_create_gallery_item_defaults() {
        let store = seed::store();
        let body = r#"{"title":"Render","type":"image"}"#;
        let response = create_gallery_item(&store, body);
        assert_eq!(response.status, 201);
        assert_eq!(response.body["featured"], false);
        assert_eq!(response.body["tags"], json!([]));
    }

    #[test]
    fn test_encoded_entity_filter() {
        let store = seed::store();
        let response = get_gallery(&store, "entityId=noize%2Dpath");
        let items = response.body.as_array().unwrap();
        assert!(items.iter().all(|i| i["entityId"] == "noize-path"));
        assert!(!items.is_empty());
    }
}
