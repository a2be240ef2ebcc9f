// ABOUTME: In-process seed content, rebuilt into a fresh store at startup.
// ABOUTME: Fixed ids and timestamps so list ordering is stable.

use chrono::{DateTime, Utc};
use mpl_core::LabEntity;

use crate::store::{GalleryItem, MemoryStore, Post};

fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

fn post(
    id: &str,
    title: &str,
    slug: &str,
    excerpt: &str,
    content: &str,
    tags: &[&str],
    featured: bool,
    published: bool,
    created: i64,
) -> Post {
    let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
    Post {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        excerpt: Some(excerpt.to_string()),
        slug: slug.to_string(),
        featured,
        published,
        entity_id: LabEntity::assign(slug, &tags).id.to_string(),
        tags,
        created_at: ts(created),
        updated_at: ts(created),
    }
}

fn gallery_item(
    id: &str,
    title: &str,
    kind: &str,
    entity_id: &str,
    featured: bool,
    created: i64,
) -> GalleryItem {
    GalleryItem {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        image_url: Some(format!("/media/{id}.png")),
        video_url: None,
        kind: kind.to_string(),
        featured,
        tags: Vec::new(),
        entity_id: entity_id.to_string(),
        created_at: ts(created),
    }
}

/// Build the startup store. Everything here is in-memory and mutable;
/// a restart resets it.
pub fn store() -> MemoryStore {
    let posts = vec![
        post(
            "1",
            "Signal bleed in the hex waterfall",
            "signal-bleed-hex-waterfall",
            "Where the column renderer leaks phase into its neighbors, and why we kept it.",
            "The waterfall was supposed to be ten independent columns. \
             It is not, and the bleed turned out to be the best part. \
             This post walks the renderer from seed to scanline.",
            &["generative", "visual"],
            true,
            true,
            1_736_424_000,
        ),
        post(
            "2",
            "Tuning the entity tones",
            "tuning-entity-tones",
            "Every entity's voice is a hash. Here is how the synthesis chain reads it.",
            "Each persona gets a base frequency, a modulation rate, and a \
             filter from the same 31-based hash of its id. Change the id, \
             change the voice. Nothing is stored.",
            &["audio", "synthesis"],
            true,
            true,
            1_736_510_400,
        ),
        post(
            "3",
            "Notes on the boot roll-call",
            "boot-roll-call",
            "The authentication sequence is theater, but the pacing rules are real.",
            "The typewriter delay, the glitch bursts, the per-entity \
             sign-on line. A tour of the script generator and the knobs \
             the config file exposes.",
            &["interface", "design"],
            false,
            true,
            1_736_596_800,
        ),
        post(
            "4",
            "Draft: corrupted terminal grammar",
            "corrupted-terminal-grammar",
            "Unpublished working notes.",
            "Which characters corrode into which, and at what rate.",
            &[],
            false,
            false,
            1_736_683_200,
        ),
    ];

    let gallery = vec![
        gallery_item("g1", "Interference study 04", "image", "filament", true, 1_736_424_000),
        gallery_item("g2", "Feedback tunnel capture", "video", "sub-signal", true, 1_736_510_400),
        gallery_item("g3", "Circuit trace plot", "image", "drexom", false, 1_736_596_800),
        gallery_item("g4", "Oscilloscope session", "image", "noize-path", false, 1_736_683_200),
    ];

    MemoryStore::with_content(posts, gallery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ContentStore, GalleryQuery, PostQuery};

    #[test]
    fn test_seed_has_published_and_unpublished_posts() {
        let store = store();
        let published = store.posts(&PostQuery::default()).unwrap();
        let drafts = store
            .posts(&PostQuery {
                published: false,
                ..PostQuery::default()
            })
            .unwrap();
        assert!(!published.is_empty());
        assert!(!drafts.is_empty());
    }

    #[test]
    fn test_seed_gallery_featured_split() {
        let store = store();
        let all = store.gallery(&GalleryQuery::default()).unwrap();
        let featured = all.iter().filter(|i| i.featured).count();
        assert_eq!(featured, 2);
        assert!(all.len() > featured);
    }

    #[test]
    fn test_seed_entities_exist() {
        let store = store();
        for item in store.gallery(&GalleryQuery::default()).unwrap() {
            assert!(LabEntity::by_id(&item.entity_id).is_some());
        }
        for post in store.posts(&PostQuery::default()).unwrap() {
            assert!(LabEntity::by_id(&post.entity_id).is_some());
        }
    }

    #[test]
    fn test_audio_tagged_post_routed_to_specialist() {
        let store = store();
        let post = store.post_by_slug("tuning-entity-tones").unwrap().unwrap();
        assert_eq!(post.entity_id, "noize-path");
    }
}
