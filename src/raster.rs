use crate::{
    canvas::Canvas,
    fonts::{FontAssets, Weight},
};
use anyhow::Context;
use resvg::{
    tiny_skia::{Pixmap, Transform},
    usvg::{Options, Tree},
};

/// Rasterizes `svg` onto a canvas-sized pixmap and encodes it as PNG.
pub fn svg_to_png(svg: &str, fonts: &FontAssets, canvas: Canvas) -> anyhow::Result<Vec<u8>> {
    let opt = Options {
        fontdb: fonts.database(),
        font_family: fonts.family(Weight::Regular).to_string(),
        ..Default::default()
    };

    let rtree = Tree::from_str(svg, &opt).context("Failed to parse SVG")?;

    let mut pixmap =
        Pixmap::new(canvas.width, canvas.height).context("Failed to create pixmap")?;
    resvg::render(&rtree, Transform::identity(), &mut pixmap.as_mut());

    let encoded = pixmap.encode_png().context("Failed to encode PNG")?;

    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CANVAS;

    #[test]
    fn output_matches_canvas() {
        let fonts = FontAssets::bundled().unwrap();
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#f00"/></svg>"##;

        let png = svg_to_png(svg, &fonts, CANVAS).unwrap();
        let decoded = Pixmap::decode_png(&png).unwrap();

        assert_eq!((decoded.width(), decoded.height()), (1200, 630));
    }

    #[test]
    fn malformed_svg_fails() {
        let fonts = FontAssets::bundled().unwrap();
        assert!(svg_to_png("<svg", &fonts, CANVAS).is_err());
    }
}
