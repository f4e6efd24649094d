use crate::glob::Glob;
use anyhow::Context;
use fs_err::tokio as fs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub content: Content,
    #[serde(default)]
    pub output: Output,
    pub fonts: Option<Fonts>,
    #[serde(default)]
    pub card: Card,
}

impl Config {
    pub async fn read(path: &Path) -> anyhow::Result<Config> {
        let config = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;
        Self::parse(&config).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(source: &str) -> anyhow::Result<Config> {
        Ok(toml::from_str(source)?)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Content {
    pub path: Glob,
    #[serde(default)]
    pub include_drafts: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist/og-image")
}

fn default_route() -> String {
    "/og-image".to_string()
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Output {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// URL path the output directory is served under.
    #[serde(default = "default_route")]
    pub route: String,
    /// Where to write a `_headers` file listing each image's response headers.
    pub headers_file: Option<PathBuf>,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            route: default_route(),
            headers_file: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Fonts {
    pub regular: PathBuf,
    pub bold: PathBuf,
}

pub const DEFAULT_DATE_FORMAT: &str = "%A, %B %-d";
pub const DEFAULT_ATTRIBUTION: &str = "by Emilian R.";

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_attribution() -> String {
    DEFAULT_ATTRIBUTION.to_string()
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Card {
    /// chrono strftime pattern used for the date line.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_attribution")]
    pub attribution: String,
}

impl Default for Card {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            attribution: default_attribution(),
        }
    }
}
