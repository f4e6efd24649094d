use crate::{date::DateFormat, paths::Props, render::Renderer};

pub const CONTENT_TYPE: &str = "image/png";
pub const CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// What the image route returns for one post.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewResponse {
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub cache_control: &'static str,
}

impl PreviewResponse {
    pub fn png(body: Vec<u8>) -> Self {
        Self {
            body,
            content_type: CONTENT_TYPE,
            cache_control: CACHE_CONTROL,
        }
    }

    pub fn headers(&self) -> [(&'static str, &'static str); 2] {
        [
            ("Content-Type", self.content_type),
            ("Cache-Control", self.cache_control),
        ]
    }
}

/// Handles `og-image/<slug>.png` for one static path.
pub fn get(
    props: &Props,
    renderer: &Renderer,
    date_format: &DateFormat,
) -> anyhow::Result<PreviewResponse> {
    let date = date_format.format(props.pub_date);
    let png = renderer.render(&props.title, &date)?;
    Ok(PreviewResponse::png(png))
}
