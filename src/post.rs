use crate::date;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// A blog post from the content collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub publish_date: NaiveDate,
    pub updated_date: Option<NaiveDate>,
    /// A hand-made preview image. Posts with one are never rendered.
    pub og_image: Option<String>,
    pub draft: bool,
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrontMatter {
    title: String,
    publish_date: String,
    updated_date: Option<String>,
    og_image: Option<String>,
    #[serde(default)]
    draft: bool,
    slug: Option<String>,
}

enum FrontMatterKind {
    Yaml,
    Toml,
}

fn split_front_matter(source: &str) -> Option<(FrontMatterKind, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let first_line_end = source.find('\n')?;
    let (kind, fence) = match source[..first_line_end].trim_end() {
        "---" => (FrontMatterKind::Yaml, "---"),
        "+++" => (FrontMatterKind::Toml, "+++"),
        _ => return None,
    };

    let body = &source[first_line_end + 1..];
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim_end() == fence {
            return Some((kind, &body[..offset]));
        }
        offset += line.len();
    }

    None
}

impl Post {
    /// Parses a post file. `rel_path` is the path inside the collection and
    /// determines the slug unless the front matter sets one.
    pub fn parse(source: &str, rel_path: &Path, path: PathBuf) -> anyhow::Result<Post> {
        let (kind, front_matter) =
            split_front_matter(source).context("File has no front matter")?;

        let front_matter: FrontMatter = match kind {
            FrontMatterKind::Yaml => serde_yaml::from_str(front_matter)?,
            FrontMatterKind::Toml => {
                let mut table: toml::Table = toml::from_str(front_matter)?;
                // Bare TOML dates go through the same parser as YAML strings.
                for (_, value) in table.iter_mut() {
                    if let toml::Value::Datetime(datetime) = &*value {
                        let text = datetime.to_string();
                        *value = toml::Value::String(text);
                    }
                }
                toml::Value::Table(table).try_into()?
            }
        };

        let slug = match &front_matter.slug {
            Some(slug) => check_slug(slug)?,
            None => slug_from_path(rel_path)?,
        };

        let publish_date = date::parse(&front_matter.publish_date).context("Invalid publishDate")?;
        let updated_date = front_matter
            .updated_date
            .as_deref()
            .map(date::parse)
            .transpose()
            .context("Invalid updatedDate")?;

        Ok(Post {
            slug,
            title: front_matter.title,
            publish_date,
            updated_date,
            og_image: front_matter.og_image.filter(|image| !image.is_empty()),
            draft: front_matter.draft,
            path,
        })
    }

    /// The date shown on the card: the last update if there was one.
    pub fn effective_date(&self) -> NaiveDate {
        self.updated_date.unwrap_or(self.publish_date)
    }
}

fn slugify(segment: &str) -> String {
    segment
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            c if c.is_whitespace() => Some('-'),
            _ => None,
        })
        .collect()
}

fn slug_from_path(rel_path: &Path) -> anyhow::Result<String> {
    let stem = rel_path.with_extension("");
    let mut segments = Vec::new();

    for component in stem.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().context("Path is not valid UTF-8")?;
                let segment = slugify(part);
                if !segment.is_empty() {
                    segments.push(segment);
                }
            }
            Component::CurDir => {}
            _ => bail!("Unexpected path component in {}", rel_path.display()),
        }
    }

    if segments.len() > 1 && segments.last().is_some_and(|last| last == "index") {
        segments.pop();
    }

    if segments.is_empty() {
        bail!("Cannot derive a slug from {}", rel_path.display());
    }

    Ok(segments.join("/"))
}

fn check_slug(slug: &str) -> anyhow::Result<String> {
    let slug = slug.trim().trim_matches('/');

    if slug.is_empty() {
        bail!("Slug is empty");
    }

    if slug
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        bail!("Slug \"{slug}\" is not a valid relative path");
    }

    if slug.contains('\\') {
        bail!("Slug \"{slug}\" contains a backslash");
    }

    Ok(slug.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse(source: &str, rel_path: &str) -> anyhow::Result<Post> {
        Post::parse(source, Path::new(rel_path), PathBuf::from(rel_path))
    }

    #[test]
    fn yaml_front_matter() {
        let post = parse(
            "---\ntitle: Hello World\npublishDate: 2024-01-01\ntags: [a, b]\n---\n\n# Body\n",
            "hello-world.md",
        )
        .unwrap();

        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.title, "Hello World");
        assert_eq!(post.publish_date, ymd(2024, 1, 1));
        assert_eq!(post.updated_date, None);
        assert_eq!(post.og_image, None);
        assert!(!post.draft);
    }

    #[test]
    fn toml_front_matter() {
        let post = parse(
            "+++\ntitle = \"Notes\"\npublishDate = 2023-06-01\nupdatedDate = \"2023-07-02\"\n+++\nbody\n",
            "notes.md",
        )
        .unwrap();

        assert_eq!(post.publish_date, ymd(2023, 6, 1));
        assert_eq!(post.updated_date, Some(ymd(2023, 7, 2)));
    }

    #[test]
    fn toml_offset_datetimes_use_the_utc_day() {
        let post = parse(
            "+++\ntitle = \"Late\"\npublishDate = 2023-06-01T23:30:00-05:00\n+++\n",
            "late.md",
        )
        .unwrap();

        assert_eq!(post.publish_date, ymd(2023, 6, 2));
    }

    #[test]
    fn override_and_draft_fields() {
        let post = parse(
            "---\ntitle: T\npublishDate: \"11 Jul 2022\"\nogImage: /social.png\ndraft: true\n---\n",
            "t.md",
        )
        .unwrap();

        assert_eq!(post.og_image.as_deref(), Some("/social.png"));
        assert!(post.draft);
    }

    #[test]
    fn empty_override_is_no_override() {
        let post = parse("---\ntitle: T\npublishDate: 2022-01-01\nogImage: \"\"\n---\n", "t.md")
            .unwrap();
        assert_eq!(post.og_image, None);
    }

    #[test]
    fn effective_date_prefers_update() {
        let post = parse(
            "---\ntitle: T\npublishDate: 2022-01-01\nupdatedDate: 2022-02-03\n---\n",
            "t.md",
        )
        .unwrap();
        assert_eq!(post.effective_date(), ymd(2022, 2, 3));

        let post = parse("---\ntitle: T\npublishDate: 2022-01-01\n---\n", "t.md").unwrap();
        assert_eq!(post.effective_date(), ymd(2022, 1, 1));
    }

    #[test]
    fn slugs_follow_collection_paths() {
        let source = "---\ntitle: T\npublishDate: 2022-01-01\n---\n";
        assert_eq!(parse(source, "2024/My First Post.md").unwrap().slug, "2024/my-first-post");
        assert_eq!(parse(source, "series/part-1/index.mdx").unwrap().slug, "series/part-1");
        assert_eq!(parse(source, "index.md").unwrap().slug, "index");
        assert_eq!(parse(source, "What's New?.md").unwrap().slug, "whats-new");
    }

    #[test]
    fn front_matter_slug_wins() {
        let post = parse(
            "---\ntitle: T\npublishDate: 2022-01-01\nslug: /custom/slug/\n---\n",
            "file.md",
        )
        .unwrap();
        assert_eq!(post.slug, "custom/slug");
    }

    #[test]
    fn unsafe_slugs_are_rejected() {
        let source = "---\ntitle: T\npublishDate: 2022-01-01\nslug: ../escape\n---\n";
        assert!(parse(source, "file.md").is_err());
    }

    #[test]
    fn missing_front_matter_or_fields_fail() {
        assert!(parse("# just markdown\n", "a.md").is_err());
        assert!(parse("---\ntitle: T\n---\n", "a.md").is_err());
        assert!(parse("---\ntitle: T\npublishDate: someday\n---\n", "a.md").is_err());
        assert!(parse("---\ntitle: T\npublishDate: 2022-01-01\n", "a.md").is_err());
    }
}
