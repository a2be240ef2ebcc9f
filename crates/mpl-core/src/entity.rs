// ABOUTME: Lab entity personas that own and sign site content.
// ABOUTME: Fixed list with accent colors, glitch patterns, and assignment rules.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Color;

/// Background animation assigned to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    Oscilloscope,
    Circuit,
    HexWaterfall,
    GlitchGrid,
    SoftParticles,
    FlowField,
    WaveInterference,
    FeedbackLoop,
    CorruptedTerminal,
    /// Meta variant that rotates through all of the above
    All,
}

impl AnimationKind {
    pub fn all() -> &'static [AnimationKind] {
        &[
            AnimationKind::Oscilloscope,
            AnimationKind::Circuit,
            AnimationKind::HexWaterfall,
            AnimationKind::GlitchGrid,
            AnimationKind::SoftParticles,
            AnimationKind::FlowField,
            AnimationKind::WaveInterference,
            AnimationKind::FeedbackLoop,
            AnimationKind::CorruptedTerminal,
            AnimationKind::All,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnimationKind::Oscilloscope => "oscilloscope",
            AnimationKind::Circuit => "circuit",
            AnimationKind::HexWaterfall => "hex-waterfall",
            AnimationKind::GlitchGrid => "glitch-grid",
            AnimationKind::SoftParticles => "soft-particles",
            AnimationKind::FlowField => "flow-field",
            AnimationKind::WaveInterference => "interference",
            AnimationKind::FeedbackLoop => "feedback",
            AnimationKind::CorruptedTerminal => "corrupted-terminal",
            AnimationKind::All => "all",
        }
    }

    pub fn from_label(label: &str) -> Option<AnimationKind> {
        AnimationKind::all().iter().copied().find(|k| k.label() == label)
    }
}

/// A lab persona. Constructed once at load, read-only thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabEntity {
    pub id: &'static str,
    pub name: &'static str,
    pub signature: &'static str,
    pub version: &'static str,
    pub color: &'static str,
    pub role: &'static str,
    pub glitch_pattern: Option<&'static str>,
    pub animation: Option<AnimationKind>,
}

pub const LAB_ENTITIES: &[LabEntity] = &[
    LabEntity {
        id: "null-form",
        name: "nU11.form",
        signature: "[nU11.form]",
        version: "v0.3a",
        color: "#00f4ff",
        role: "Logic-melting glitch theorist",
        glitch_pattern: Some("█▓▒░"),
        animation: Some(AnimationKind::GlitchGrid),
    },
    LabEntity {
        id: "drexom",
        name: "drex:0m",
        signature: "[drex:0m]",
        version: "b01",
        color: "#9b59ff",
        role: "Structural rewriter/chaos mapper",
        glitch_pattern: Some("◢◤◥◣"),
        animation: Some(AnimationKind::Circuit),
    },
    LabEntity {
        id: "noize-path",
        name: "noize.p4th",
        signature: "[noize.p4th]",
        version: "//dev.05",
        color: "#59ff6d",
        role: "Audio-reactive tactician",
        glitch_pattern: Some("∿∿∿"),
        animation: Some(AnimationKind::Oscilloscope),
    },
    LabEntity {
        id: "xeno-form",
        name: "x3n0.form",
        signature: "[x3n0.form]",
        version: "∆x.14",
        color: "#0078f2",
        role: "Generative alien artifacts expert",
        glitch_pattern: Some("⟨⟩⟪⟫"),
        animation: Some(AnimationKind::HexWaterfall),
    },
    LabEntity {
        id: "filament",
        name: "ƒ1lament",
        signature: "[ƒ1lament]",
        version: "v1.0a",
        color: "#d982ff",
        role: "Delicate waveform sculptor",
        glitch_pattern: Some("≈≋≈"),
        animation: Some(AnimationKind::WaveInterference),
    },
    LabEntity {
        id: "sub-signal",
        name: "5ub.signal",
        signature: "[5ub.signal]",
        version: ".sig/3.3",
        color: "#ffe95c",
        role: "Feedback manipulator",
        glitch_pattern: Some("◉◎◉"),
        animation: Some(AnimationKind::FeedbackLoop),
    },
    LabEntity {
        id: "iris-fade",
        name: "1r1s.fade",
        signature: "[1r1s.fade]",
        version: "::OBSCURA",
        color: "#ffa4f9",
        role: "Cinematic ghost of soft light",
        glitch_pattern: Some("░▒▓"),
        animation: Some(AnimationKind::SoftParticles),
    },
    LabEntity {
        id: "ctrl-noir",
        name: "ctrlN0!r",
        signature: "[ctrlN0!r]",
        version: "CRL/09",
        color: "#ff5566",
        role: "Interface saboteur",
        glitch_pattern: Some("▪▫▪"),
        animation: Some(AnimationKind::CorruptedTerminal),
    },
    LabEntity {
        id: "node-state",
        name: "NØD3//STATE",
        signature: "[NØD3//STATE]",
        version: "07_hz",
        color: "#58d2bf",
        role: "Topological flow architect",
        glitch_pattern: Some("⌬⌬⌬"),
        animation: Some(AnimationKind::FlowField),
    },
    LabEntity {
        id: "multipass",
        name: "mu1ti.p@ss",
        signature: "[mu1ti.p@ss]",
        version: "root",
        color: "#dddddd",
        role: "Meta-entity/master access",
        glitch_pattern: Some("░░░"),
        animation: Some(AnimationKind::All),
    },
];

/// Tag keywords that route a post to a specialist entity
const ENTITY_EXPERTISE: &[(&str, &[&str])] = &[
    ("noize-path", &["audio", "sound", "music", "synthesis", "dsp"]),
    ("xeno-form", &["generative", "ai", "ml", "neural", "gan"]),
    ("ctrl-noir", &["ui", "interface", "frontend", "css", "design"]),
    ("filament", &["shaders", "graphics", "webgl", "three", "visual"]),
];

impl LabEntity {
    pub fn all() -> &'static [LabEntity] {
        LAB_ENTITIES
    }

    pub fn by_id(id: &str) -> Option<&'static LabEntity> {
        LAB_ENTITIES.iter().find(|e| e.id == id)
    }

    pub fn random<R: Rng>(rng: &mut R) -> &'static LabEntity {
        &LAB_ENTITIES[rng.gen_range(0..LAB_ENTITIES.len())]
    }

    /// Deterministic entity from a string seed (post slug, title, ...)
    pub fn seeded(seed: &str) -> &'static LabEntity {
        let index = string_hash(seed) as usize % LAB_ENTITIES.len();
        &LAB_ENTITIES[index]
    }

    /// Specialist entity whose expertise keywords match any of the tags
    pub fn for_tags<S: AsRef<str>>(tags: &[S]) -> Option<&'static LabEntity> {
        for (id, keywords) in ENTITY_EXPERTISE {
            let matched = tags.iter().any(|tag| {
                let tag = tag.as_ref().to_lowercase();
                keywords.iter().any(|k| tag.contains(k))
            });
            if matched {
                return LabEntity::by_id(id);
            }
        }
        None
    }

    /// Owning entity for a post: expertise match first, then seeded hash
    pub fn assign<S: AsRef<str>>(seed: &str, tags: &[S]) -> &'static LabEntity {
        LabEntity::for_tags(tags).unwrap_or_else(|| LabEntity::seeded(seed))
    }

    /// "[signature] version" display string
    pub fn full_signature(&self) -> String {
        format!("{} {}", self.signature, self.version)
    }

    pub fn accent(&self) -> Color {
        Color::from_hex_or_accent(self.color)
    }

    /// Substitute ~20% of characters with the entity's glitch pattern.
    /// Entities without a pattern return the text unchanged.
    pub fn glitch_text<R: Rng>(&self, text: &str, rng: &mut R) -> String {
        let Some(pattern) = self.glitch_pattern else {
            return text.to_string();
        };
        let pattern: Vec<char> = pattern.chars().collect();
        text.chars()
            .map(|c| {
                if rng.gen::<f32>() > 0.8 {
                    pattern[rng.gen_range(0..pattern.len())]
                } else {
                    c
                }
            })
            .collect()
    }
}

/// 31-based string hash over UTF-16 code units, matching the site's
/// historical content-to-entity assignment. Must stay stable: seeded
/// entity picks and per-entity audio tones both derive from it.
pub fn string_hash(s: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in s.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32);
    }
    hash.unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_entity_count_and_lookup() {
        assert_eq!(LAB_ENTITIES.len(), 10);
        assert_eq!(LabEntity::by_id("drexom").unwrap().name, "drex:0m");
        assert!(LabEntity::by_id("missing").is_none());
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let a = LabEntity::seeded("gpt5-codex-cli-macos-update");
        let b = LabEntity::seeded("gpt5-codex-cli-macos-update");
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_expertise_overrides_seed() {
        let entity = LabEntity::assign("some-slug", &["Modular-Synthesis", "gear"]);
        assert_eq!(entity.id, "noize-path");
    }

    #[test]
    fn test_assign_falls_back_to_seed() {
        let entity = LabEntity::assign("some-slug", &["travel"]);
        assert_eq!(entity.id, LabEntity::seeded("some-slug").id);
    }

    #[test]
    fn test_full_signature() {
        let entity = LabEntity::by_id("multipass").unwrap();
        assert_eq!(entity.full_signature(), "[mu1ti.p@ss] root");
    }

    #[test]
    fn test_glitch_text_same_length() {
        let mut rng = SmallRng::seed_from_u64(7);
        let entity = LabEntity::by_id("null-form").unwrap();
        let out = entity.glitch_text("system ready", &mut rng);
        assert_eq!(out.chars().count(), "system ready".chars().count());
    }

    #[test]
    fn test_string_hash_stability() {
        // Known values; the audio tone derivation depends on these
        assert_eq!(string_hash(""), 0);
        assert_ne!(string_hash("null-form"), string_hash("drexom"));
        assert_eq!(string_hash("noize-path"), string_hash("noize-path"));
    }

    #[test]
    fn test_every_entity_color_parses() {
        for entity in LabEntity::all() {
            assert!(
                Color::from_hex(entity.color).is_some(),
                "bad color for {}",
                entity.id
            );
        }
    }
}
