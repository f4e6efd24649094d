use clap::Parser;
use cli::{Cli, Commands};
use commands::{generate::generate, list::list, render::render};
use indicatif::MultiProgress;
use log::LevelFilter;

mod canvas;
mod cli;
mod commands;
mod config;
mod content;
mod date;
mod fonts;
mod glob;
mod hash;
mod layout;
mod lockfile;
mod markup;
mod paths;
mod post;
mod progress_bar;
mod raster;
mod render;
mod response;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut binding = env_logger::Builder::new();
    let logger = binding
        .filter_level(LevelFilter::Info)
        .filter_module("ogimage", args.verbose.log_level_filter())
        .format_timestamp(None)
        .format_module_path(false)
        .build();

    let level = logger.filter();

    let multi_progress = MultiProgress::new();
    indicatif_log_bridge::LogWrapper::new(multi_progress.clone(), logger).try_init()?;

    log::set_max_level(level);

    match args.command {
        Commands::Generate(args) => generate(args, multi_progress).await,
        Commands::List(args) => list(args).await,
        Commands::Render(args) => render(args).await,
    }
}
