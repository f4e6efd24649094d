use crate::{config, hash::Hash};
use anyhow::Context;
use fs_err::tokio as fs;
use resvg::usvg::fontdb::{Database, Source};
use std::{collections::HashMap, sync::Arc};

static BUNDLED_REGULAR: &[u8] = include_bytes!("../assets/fonts/DejaVuSansMono.ttf");
static BUNDLED_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSansMono-Bold.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

impl Weight {
    pub fn css(self) -> u16 {
        match self {
            Weight::Regular => 400,
            Weight::Bold => 700,
        }
    }
}

/// Horizontal advances and vertical metrics, read once when a face loads.
#[derive(Debug)]
struct Metrics {
    units_per_em: f32,
    ascender: f32,
    descender: f32,
    /// Used for characters the face has no glyph for.
    fallback: u16,
    advances: HashMap<char, u16>,
}

impl Metrics {
    fn read(face: &ttf_parser::Face<'_>) -> Metrics {
        let advance = |ch: char| face.glyph_index(ch).and_then(|id| face.glyph_hor_advance(id));

        let mut advances = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|codepoint| {
                    if let Some(ch) = char::from_u32(codepoint) {
                        if let Some(width) = advance(ch) {
                            advances.insert(ch, width);
                        }
                    }
                });
            }
        }

        Metrics {
            units_per_em: f32::from(face.units_per_em()),
            ascender: f32::from(face.ascender()),
            descender: f32::from(face.descender()),
            fallback: advance(' ').unwrap_or(face.units_per_em() / 2),
            advances,
        }
    }
}

#[derive(Debug)]
struct Face {
    family: String,
    metrics: Metrics,
}

impl Face {
    fn load(db: &mut Database, data: Vec<u8>, label: &str) -> anyhow::Result<Face> {
        let metrics = {
            let face = ttf_parser::Face::parse(&data, 0)
                .with_context(|| format!("Failed to parse {label} font"))?;
            Metrics::read(&face)
        };

        let ids = db.load_font_source(Source::Binary(Arc::new(data)));
        let family = ids
            .first()
            .and_then(|id| db.face(*id))
            .and_then(|info| info.families.first())
            .map(|(name, _)| name.clone())
            .with_context(|| format!("The {label} font has no family name"))?;

        Ok(Face { family, metrics })
    }
}

/// The regular and bold faces every card is set in.
///
/// Loaded once and shared by all renders.
#[derive(Debug)]
pub struct FontAssets {
    regular: Face,
    bold: Face,
    db: Arc<Database>,
    hash: Hash,
}

impl FontAssets {
    pub fn from_bytes(regular: Vec<u8>, bold: Vec<u8>) -> anyhow::Result<FontAssets> {
        let hash = Hash::new_from_parts(&[regular.as_slice(), bold.as_slice()]);

        let mut db = Database::new();
        let regular = Face::load(&mut db, regular, "regular")?;
        let bold = Face::load(&mut db, bold, "bold")?;
        db.set_monospace_family(regular.family.clone());

        Ok(FontAssets {
            regular,
            bold,
            db: Arc::new(db),
            hash,
        })
    }

    pub fn bundled() -> anyhow::Result<FontAssets> {
        Self::from_bytes(BUNDLED_REGULAR.to_vec(), BUNDLED_BOLD.to_vec())
    }

    /// Reads the configured font files, or falls back to the bundled faces.
    pub async fn load(fonts: Option<&config::Fonts>) -> anyhow::Result<FontAssets> {
        let Some(fonts) = fonts else {
            return Self::bundled();
        };

        let regular = fs::read(&fonts.regular)
            .await
            .context("Failed to read regular font")?;
        let bold = fs::read(&fonts.bold)
            .await
            .context("Failed to read bold font")?;

        Self::from_bytes(regular, bold)
    }

    fn face(&self, weight: Weight) -> &Face {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }

    pub fn family(&self, weight: Weight) -> &str {
        &self.face(weight).family
    }

    /// Advance width of `text` set at `size` pixels, without kerning.
    pub fn measure(&self, text: &str, size: f32, weight: Weight) -> f32 {
        let metrics = &self.face(weight).metrics;
        let units = text
            .chars()
            .map(|ch| metrics.advances.get(&ch).copied().unwrap_or(metrics.fallback))
            .map(u32::from)
            .sum::<u32>();

        units as f32 * size / metrics.units_per_em
    }

    /// Ascender and descender as fractions of the em; the descender is negative.
    pub fn vertical_metrics(&self, weight: Weight) -> (f32, f32) {
        let metrics = &self.face(weight).metrics;
        (
            metrics.ascender / metrics.units_per_em,
            metrics.descender / metrics.units_per_em,
        )
    }

    pub fn database(&self) -> Arc<Database> {
        self.db.clone()
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_fonts_load() {
        let fonts = FontAssets::bundled().unwrap();
        assert_eq!(fonts.family(Weight::Regular), "DejaVu Sans Mono");
        assert_eq!(fonts.family(Weight::Bold), "DejaVu Sans Mono");
        assert_eq!(fonts.database().len(), 2);
    }

    #[test]
    fn monospace_widths_scale_with_length_and_size() {
        let fonts = FontAssets::bundled().unwrap();
        let one = fonts.measure("a", 20.0, Weight::Regular);
        let ten = fonts.measure("abcdefghij", 20.0, Weight::Regular);

        assert!(one > 0.0);
        assert!((ten - one * 10.0).abs() < 0.01);
        let double = fonts.measure("a", 40.0, Weight::Regular);
        assert!((double - one * 2.0).abs() < 0.01);
    }

    #[test]
    fn metrics_are_read_once_at_load() {
        let fonts = FontAssets::bundled().unwrap();
        let (ascender, descender) = fonts.vertical_metrics(Weight::Bold);
        assert!(ascender > 0.0 && ascender < 1.5);
        assert!(descender < 0.0);

        // U+10FFFD is a private-use codepoint the bundled face has no glyph for.
        let missing = fonts.measure("\u{10fffd}", 20.0, Weight::Regular);
        let space = fonts.measure(" ", 20.0, Weight::Regular);
        assert_eq!(missing, space);
    }

    #[test]
    fn garbage_font_is_rejected() {
        let err = FontAssets::from_bytes(b"not a font".to_vec(), BUNDLED_BOLD.to_vec());
        assert!(err.is_err());
    }

    #[test]
    fn hash_depends_on_both_faces() {
        let a = FontAssets::bundled().unwrap();
        let b = FontAssets::from_bytes(BUNDLED_BOLD.to_vec(), BUNDLED_REGULAR.to_vec()).unwrap();
        assert_ne!(a.hash(), b.hash());
    }
}
