// ABOUTME: Locale negotiation and the static message catalog.
// ABOUTME: URL path prefixes select a locale; unknown prefixes render 404.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    pub fn all() -> &'static [Locale] {
        &[Locale::En, Locale::Es]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }

    pub fn from_code(code: &str) -> Option<Locale> {
        Locale::all().iter().copied().find(|l| l.code() == code)
    }

    /// Split a request path into its locale prefix and the remainder.
    /// `/en/blog` -> `(En, "/blog")`, `/es` -> `(Es, "/")`.
    /// An unrecognized prefix returns None (handled as not-found).
    pub fn negotiate(path: &str) -> Option<(Locale, &str)> {
        let trimmed = path.strip_prefix('/')?;
        let (prefix, rest) = match trimmed.split_once('/') {
            Some((prefix, rest)) => (prefix, rest),
            None => (trimmed, ""),
        };
        let locale = Locale::from_code(prefix)?;
        if rest.is_empty() {
            Some((locale, "/"))
        } else {
            // Keep the leading slash on the remainder
            Some((locale, &path[1 + prefix.len()..]))
        }
    }

    /// Look up a namespaced message key, falling back to English.
    /// A key missing from both catalogs renders as empty.
    pub fn message(&self, key: &str) -> &'static str {
        lookup(*self, key)
            .or_else(|| lookup(Locale::En, key))
            .unwrap_or("")
    }
}

fn lookup(locale: Locale, key: &str) -> Option<&'static str> {
    MESSAGES
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, en, es)| match locale {
            Locale::En => *en,
            Locale::Es => *es,
        })
}

/// (key, en, es) — namespaces mirror the common/shop catalog split
const MESSAGES: &[(&str, &str, &str)] = &[
    ("common.site.title", "MultiPass Labs", "MultiPass Labs"),
    (
        "common.site.tagline",
        "Transmissions from the entity collective",
        "Transmisiones del colectivo de entidades",
    ),
    ("common.navigation.home", "Home", "Inicio"),
    ("common.navigation.blog", "Blog", "Blog"),
    ("common.navigation.gallery", "Gallery", "Galería"),
    ("common.navigation.shop", "Shop", "Tienda"),
    ("common.navigation.music", "Music", "Música"),
    ("common.navigation.about", "About", "Acerca de"),
    ("common.labels.featured", "Featured", "Destacado"),
    ("common.labels.by", "by", "por"),
    ("common.notfound.title", "404 // signal lost", "404 // señal perdida"),
    (
        "common.notfound.body",
        "The entity you followed has dissolved.",
        "La entidad que seguías se ha disuelto.",
    ),
    ("shop.title", "Shop", "Tienda"),
    (
        "shop.description",
        "Discover unique artwork and exclusive pieces",
        "Descubre obras de arte únicas y piezas exclusivas",
    ),
    (
        "shop.coming_soon",
        "Checkout is offline. The entities are negotiating.",
        "El pago está fuera de línea. Las entidades están negociando.",
    ),
    (
        "music.description",
        "Experience audio-reactive visuals and musical content",
        "Experimenta visuales audiorreactivos y contenido musical",
    ),
    (
        "music.coming_soon",
        "Music functionality coming soon...",
        "La funcionalidad de música llegará pronto...",
    ),
];
