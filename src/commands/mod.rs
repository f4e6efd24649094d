use crate::{
    config::{Card, Fonts},
    date::DateFormat,
    fonts::FontAssets,
    markup::Template,
    render::Renderer,
};
use std::sync::Arc;

pub mod generate;
pub mod list;
pub mod render;

/// Loads the fonts and card settings every render shares.
async fn renderer(fonts: Option<&Fonts>, card: &Card) -> anyhow::Result<(Renderer, DateFormat)> {
    let date_format = DateFormat::new(&card.date_format)?;
    let fonts = Arc::new(FontAssets::load(fonts).await?);
    let template = Template {
        attribution: card.attribution.clone(),
    };

    Ok((Renderer::new(fonts, template), date_format))
}
