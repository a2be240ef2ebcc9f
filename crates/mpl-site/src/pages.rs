// ABOUTME: Server-rendered locale pages: home, blog, gallery, shop, music, about.
// ABOUTME: Minimal HTML over the message catalog and entity theming.

use mpl_core::{LabEntity, Locale};

use crate::store::{ContentStore, GalleryQuery, PostQuery};

#[derive(Debug)]
pub struct Page {
    pub status: u16,
    pub html: String,
}

impl Page {
    fn ok(html: String) -> Self {
        Self { status: 200, html }
    }
}

/// Render the page at a locale-stripped path (`/blog`, `/gallery`, ...).
pub fn render(store: &dyn ContentStore, locale: Locale, path: &str) -> Page {
    let mut segments = path.trim_matches('/').splitn(2, '/');
    let first = segments.next().unwrap_or("");
    let rest = segments.next();

    match (first, rest) {
        ("", None) => home(store, locale),
        ("blog", None) => blog_index(store, locale),
        ("blog", Some(slug)) => blog_post(store, locale, slug),
        ("gallery", None) => gallery(store, locale),
        ("shop", None) => shop(locale),
        ("music", None) => music(locale),
        ("about", None) => about(locale),
        _ => not_found(locale),
    }
}

pub fn not_found(locale: Locale) -> Page {
    let body = format!(
        "<h1>{}</h1><p>{}</p>",
        locale.message("common.notfound.title"),
        locale.message("common.notfound.body"),
    );
    Page {
        status: 404,
        html: layout(locale, locale.message("common.notfound.title"), &body),
    }
}

fn store_failure(locale: Locale) -> Page {
    Page {
        status: 500,
        html: layout(locale, "500", "<h1>500 // store unavailable</h1>"),
    }
}

fn home(store: &dyn ContentStore, locale: Locale) -> Page {
    let query = PostQuery {
        featured: true,
        limit: 3,
        ..PostQuery::default()
    };
    let Ok(featured) = store.posts(&query) else {
        return store_failure(locale);
    };
    let mut body = format!(
        "<h1>{}</h1><p class=\"tagline\">{}</p><ul>",
        locale.message("common.site.title"),
        locale.message("common.site.tagline"),
    );
    for post in featured {
        body.push_str(&format!(
            "<li><a href=\"/{code}/blog/{slug}\">{title}</a> <em>{by} {sig}</em></li>",
            code = locale.code(),
            slug = escape(&post.slug),
            title = escape(&post.title),
            by = locale.message("common.labels.by"),
            sig = entity_signature(&post.entity_id),
        ));
    }
    body.push_str("</ul>");
    Page::ok(layout(locale, locale.message("common.site.title"), &body))
}

fn blog_index(store: &dyn ContentStore, locale: Locale) -> Page {
    let Ok(posts) = store.posts(&PostQuery::default()) else {
        return store_failure(locale);
    };
    let mut body = format!("<h1>{}</h1><ul>", locale.message("common.navigation.blog"));
    for post in posts {
        body.push_str(&format!(
            "<li><a href=\"/{code}/blog/{slug}\">{title}</a>{flag}</li>",
            code = locale.code(),
            slug = escape(&post.slug),
            title = escape(&post.title),
            flag = if post.featured {
                format!(" <strong>{}</strong>", locale.message("common.labels.featured"))
            } else {
                String::new()
            },
        ));
    }
    body.push_str("</ul>");
    Page::ok(layout(locale, locale.message("common.navigation.blog"), &body))
}

fn blog_post(store: &dyn ContentStore, locale: Locale, slug: &str) -> Page {
    let Ok(found) = store.post_by_slug(slug) else {
        return store_failure(locale);
    };
    // Drafts stay invisible on the site
    let Some(post) = found.filter(|p| p.published) else {
        return not_found(locale);
    };
    let accent = LabEntity::by_id(&post.entity_id)
        .map(|e| e.color)
        .unwrap_or("#00f4ff");
    let body = format!(
        "<article style=\"border-left: 2px solid {accent}\">\
         <h1>{title}</h1>\
         <p class=\"byline\">{by} {sig}</p>\
         <div>{content}</div>\
         </article>",
        title = escape(&post.title),
        by = locale.message("common.labels.by"),
        sig = entity_signature(&post.entity_id),
        content = escape(&post.content),
    );
    Page::ok(layout(locale, &post.title, &body))
}

fn gallery(store: &dyn ContentStore, locale: Locale) -> Page {
    let Ok(items) = store.gallery(&GalleryQuery::default()) else {
        return store_failure(locale);
    };
    let mut body = format!(
        "<h1>{}</h1><ul>",
        locale.message("common.navigation.gallery")
    );
    for item in items {
        body.push_str(&format!(
            "<li>{title} ({kind}) <em>{sig}</em></li>",
            title = escape(&item.title),
            kind = escape(&item.kind),
            sig = entity_signature(&item.entity_id),
        ));
    }
    body.push_str("</ul>");
    Page::ok(layout(
        locale,
        locale.message("common.navigation.gallery"),
        &body,
    ))
}

fn shop(locale: Locale) -> Page {
    let body = format!(
        "<h1>{}</h1><p>{}</p><p>{}</p>",
        locale.message("shop.title"),
        locale.message("shop.description"),
        locale.message("shop.coming_soon"),
    );
    Page::ok(layout(locale, locale.message("shop.title"), &body))
}

fn music(locale: Locale) -> Page {
    let body = format!(
        "<h1>{}</h1><p>{}</p><p>{}</p>",
        locale.message("common.navigation.music"),
        locale.message("music.description"),
        locale.message("music.coming_soon"),
    );
    Page::ok(layout(
        locale,
        locale.message("common.navigation.music"),
        &body,
    ))
}

fn about(locale: Locale) -> Page {
    let mut body = format!(
        "<h1>{}</h1><ul>",
        locale.message("common.navigation.about")
    );
    for entity in LabEntity::all() {
        body.push_str(&format!(
            "<li style=\"color: {color}\">{sig} — {role}</li>",
            color = entity.color,
            sig = escape(&entity.full_signature()),
            role = escape(entity.role),
        ));
    }
    body.push_str("</ul>");
    Page::ok(layout(
        locale,
        locale.message("common.navigation.about"),
        &body,
    ))
}

fn entity_signature(entity_id: &str) -> String {
    LabEntity::by_id(entity_id)
        .map(|e| escape(e.signature))
        .unwrap_or_else(|| escape(entity_id))
}

fn layout(locale: Locale, title: &str, body: &str) -> String {
    let nav: String = [
        ("", "common.navigation.home"),
        ("blog", "common.navigation.blog"),
        ("gallery", "common.navigation.gallery"),
        ("shop", "common.navigation.shop"),
        ("music", "common.navigation.music"),
        ("about", "common.navigation.about"),
    ]
    .iter()
    .map(|(path, key)| {
        format!(
            "<a href=\"/{}/{}\">{}</a>",
            locale.code(),
            path,
            locale.message(key)
        )
    })
    .collect::<Vec<_>>()
    .join(" | ");

    format!(
        "<!doctype html>\
         <html lang=\"{code}\"><head><meta charset=\"utf-8\">\
         <title>{title} :: MultiPass Labs</title></head>\
         <body><nav>{nav}</nav>{body}</body></html>",
        code = locale.code(),
        title = escape(title),
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_home_renders_in_both_locales() {
        let store = seed::store();
        let en = render(&store, Locale::En, "/");
        let es = render(&store, Locale::Es, "/");
        assert_eq!(en.status, 200);
        assert_eq!(es.status, 200);
        assert!(en.html.contains("Transmissions from the entity collective"));
        assert!(es.html.contains("Transmisiones del colectivo de entidades"));
    }

    #[test]
    fn test_blog_post_by_slug() {
        let store = seed::store();
        let page = render(&store, Locale::En, "/blog/tuning-entity-tones");
        assert_eq!(page.status, 200);
        assert!(page.html.contains("Tuning the entity tones"));
        assert!(page.html.contains("[noize.p4th]"));
    }

    #[test]
    fn test_missing_slug_renders_404() {
        let store = seed::store();
        let page = render(&store, Locale::En, "/blog/nope");
        assert_eq!(page.status, 404);
        assert!(page.html.contains("404 // signal lost"));
    }

    #[test]
    fn test_draft_post_hidden() {
        let store = seed::store();
        let page = render(&store, Locale::En, "/blog/corrupted-terminal-grammar");
        assert_eq!(page.status, 404);
    }

    #[test]
    fn test_unknown_path_renders_404() {
        let store = seed::store();
        let page = render(&store, Locale::Es, "/music/deep");
        assert_eq!(page.status, 404);
        assert!(page.html.contains("señal perdida"));
    }

    #[test]
    fn test_music_page_renders_in_both_locales() {
        let store = seed::store();
        let en = render(&store, Locale::En, "/music");
        assert_eq!(en.status, 200);
        assert!(en.html.contains("Music functionality coming soon"));
        let es = render(&store, Locale::Es, "/music");
        assert_eq!(es.status, 200);
        assert!(es.html.contains("Música"));
    }

    #[test]
    fn test_nav_links_every_section() {
        let store = seed::store();
        let page = render(&store, Locale::En, "/");
        for path in ["blog", "gallery", "shop", "music", "about"] {
            assert!(page.html.contains(&format!("href=\"/en/{path}\"")));
        }
    }

    #[test]
    fn test_about_lists_every_entity() {
        let store = seed::store();
        let page = render(&store, Locale::En, "/about");
        for entity in LabEntity::all() {
            assert!(page.html.contains(&escape(entity.signature)));
        }
    }

    #[test]
    fn test_html_escapes_content() {
        let store = seed::store();
        use crate::store::{ContentStore, NewPost};
        store
            .insert_post(NewPost {
                title: "<script>alert(1)</script>".into(),
                content: "x".into(),
                excerpt: None,
                slug: "xss".into(),
                featured: false,
                published: true,
                tags: vec![],
                entity_id: None,
            })
            .unwrap();
        let page = render(&store, Locale::En, "/blog/xss");
        assert!(!page.html.contains("<script>"));
    }
}
