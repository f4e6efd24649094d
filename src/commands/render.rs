use crate::{cli::RenderArgs, config::Config, date};
use anyhow::Context;
use fs_err::tokio as fs;
use log::info;

pub async fn render(args: RenderArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => Some(Config::read(path).await?),
        None => None,
    };

    let card = config.as_ref().map(|config| config.card.clone()).unwrap_or_default();
    let fonts = config.as_ref().and_then(|config| config.fonts.as_ref());
    let (renderer, date_format) = super::renderer(fonts, &card).await?;

    let date = date::parse(&args.date).context("Invalid --date")?;
    let date = date_format.format(date);

    let data = if args.svg {
        renderer.svg(&args.title, &date)?.into_bytes()
    } else {
        tokio::task::spawn_blocking(move || renderer.render(&args.title, &date)).await??
    };

    fs::write(&args.output, data).await?;
    info!("Wrote {}", args.output.display());

    Ok(())
}
