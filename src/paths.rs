use crate::post::Post;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A post that needs a generated preview image.
#[derive(Debug, Clone, PartialEq)]
pub struct Eligible<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub effective_date: NaiveDate,
}

/// Drops posts that ship their own preview image.
pub fn eligible(posts: &[Post]) -> Vec<Eligible<'_>> {
    posts
        .iter()
        .filter(|post| post.og_image.is_none())
        .map(|post| Eligible {
            slug: &post.slug,
            title: &post.title,
            effective_date: post.effective_date(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Params {
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Props {
    pub title: String,
    pub pub_date: NaiveDate,
}

/// One generated route: `og-image/<slug>.png`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticPath {
    pub params: Params,
    pub props: Props,
}

impl StaticPath {
    pub fn output_path(&self, dir: &Path) -> PathBuf {
        output_path(dir, &self.params.slug)
    }

    /// The image's URL path under `base`.
    pub fn route(&self, base: &str) -> String {
        format!("{}/{}.png", base.trim_end_matches('/'), self.params.slug)
    }
}

/// Where the image for `slug` is written inside `dir`.
pub fn output_path(dir: &Path, slug: &str) -> PathBuf {
    let (parents, name) = slug.rsplit_once('/').unwrap_or(("", slug));

    let mut path = dir.to_path_buf();
    path.extend(parents.split('/').filter(|segment| !segment.is_empty()));
    path.push(format!("{name}.png"));
    path
}

pub fn static_paths(posts: &[Post]) -> Vec<StaticPath> {
    eligible(posts)
        .into_iter()
        .map(|post| StaticPath {
            params: Params {
                slug: post.slug.to_string(),
            },
            props: Props {
                title: post.title.to_string(),
                pub_date: post.effective_date,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn post(slug: &str, updated: Option<NaiveDate>, og_image: Option<&str>) -> Post {
        Post {
            slug: slug.to_string(),
            title: format!("Title of {slug}"),
            publish_date: ymd(2024, 1, 1),
            updated_date: updated,
            og_image: og_image.map(str::to_string),
            draft: false,
            path: PathBuf::from(format!("{slug}.md")),
        }
    }

    #[test]
    fn one_path_per_post_without_override() {
        let posts = vec![
            post("first", None, None),
            post("custom", None, Some("/custom.png")),
            post("second", None, None),
        ];

        let paths = static_paths(&posts);
        let slugs = paths
            .iter()
            .map(|p| p.params.slug.as_str())
            .collect::<Vec<_>>();

        assert_eq!(slugs, ["first", "second"]);
        assert_eq!(paths[0].props.title, "Title of first");
    }

    #[test]
    fn updated_date_wins_over_publish_date() {
        let posts = vec![
            post("updated", Some(ymd(2024, 6, 30)), None),
            post("untouched", None, None),
        ];

        let paths = static_paths(&posts);

        assert_eq!(paths[0].props.pub_date, ymd(2024, 6, 30));
        assert_eq!(paths[1].props.pub_date, ymd(2024, 1, 1));
    }

    #[test]
    fn empty_collection_has_no_paths() {
        assert!(static_paths(&[]).is_empty());
    }

    #[test]
    fn nested_slugs_become_directories() {
        let paths = static_paths(&[post("2024/hello", None, None)]);

        assert_eq!(
            paths[0].output_path(Path::new("dist/og-image")),
            PathBuf::from("dist/og-image/2024/hello.png")
        );
        assert_eq!(paths[0].route("/og-image/"), "/og-image/2024/hello.png");
        assert_eq!(paths[0].route(""), "/2024/hello.png");
    }

    #[test]
    fn slugs_with_dots_keep_them() {
        let paths = static_paths(&[post("v1.2-release", None, None)]);

        assert_eq!(
            paths[0].output_path(Path::new("out")),
            PathBuf::from("out/v1.2-release.png")
        );
    }
}
