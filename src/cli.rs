use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::{num::NonZeroUsize, path::PathBuf};

#[derive(Parser)]
#[command(version, about = "Render Open Graph preview images for blog posts.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render an image for every post that needs one.
    Generate(GenerateArgs),

    /// List the image paths that would be generated.
    List(ListArgs),

    /// Render a single card, for previewing the design.
    Render(RenderArgs),
}

#[derive(Args, Clone)]
pub struct GenerateArgs {
    /// Path to the config file.
    #[arg(short, long, default_value = "ogimage.toml")]
    pub config: PathBuf,

    /// Render nothing; fail if any image is out of date.
    #[arg(long, action)]
    pub dry_run: bool,

    /// Render every image, even ones that are up to date.
    #[arg(long, action)]
    pub force: bool,

    /// Skip posts that fail to render instead of stopping.
    /// The command still fails once every other post is done.
    #[arg(long, action)]
    pub keep_going: bool,

    /// How many images to render at once. Defaults to the number of CPUs.
    #[arg(short, long)]
    pub jobs: Option<NonZeroUsize>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Path to the config file.
    #[arg(short, long, default_value = "ogimage.toml")]
    pub config: PathBuf,

    /// Print the paths as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct RenderArgs {
    /// The post title.
    #[arg(long)]
    pub title: String,

    /// The post date, e.g. 2024-01-01.
    #[arg(long)]
    pub date: String,

    /// Config file to take fonts and card settings from.
    /// Defaults are used when it is not given.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to write the image.
    #[arg(short, long, default_value = "og-image.png")]
    pub output: PathBuf,

    /// Write the laid out SVG instead of the PNG.
    #[arg(long)]
    pub svg: bool,
}
