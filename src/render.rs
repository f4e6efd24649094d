use crate::{
    canvas::{Canvas, CANVAS},
    fonts::FontAssets,
    hash::Hash,
    layout,
    markup::Template,
    raster,
};
use std::sync::Arc;

/// Turns a title and a formatted date into a PNG card.
///
/// Cheap to clone; clones share the font assets.
#[derive(Debug, Clone)]
pub struct Renderer {
    fonts: Arc<FontAssets>,
    template: Arc<Template>,
    canvas: Canvas,
}

impl Renderer {
    pub fn new(fonts: Arc<FontAssets>, template: Template) -> Self {
        Self {
            fonts,
            template: Arc::new(template),
            canvas: CANVAS,
        }
    }

    pub fn svg(&self, title: &str, date: &str) -> anyhow::Result<String> {
        let root = self.template.build(title, date);
        layout::to_svg(&root, &self.fonts, self.canvas)
    }

    pub fn render(&self, title: &str, date: &str) -> anyhow::Result<Vec<u8>> {
        let svg = self.svg(title, date)?;
        raster::svg_to_png(&svg, &self.fonts, self.canvas)
    }

    /// Identifies everything that affects the output for these inputs.
    pub fn fingerprint(&self, title: &str, date: &str) -> Hash {
        Hash::new_from_parts(&[
            env!("CARGO_PKG_VERSION").as_bytes(),
            self.fonts.hash().to_string().as_bytes(),
            self.template.attribution.as_bytes(),
            title.as_bytes(),
            date.as_bytes(),
        ])
    }
}
