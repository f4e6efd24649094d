use crate::{config::Content, post::Post};
use anyhow::{bail, Context};
use fs_err::tokio as fs;
use log::debug;
use std::collections::BTreeMap;
use walkdir::WalkDir;

/// Reads every post matched by the content glob, sorted by slug.
///
/// Drafts are dropped unless the config asks for them. Two posts that
/// resolve to the same slug are an error.
pub async fn collect(content: &Content) -> anyhow::Result<Vec<Post>> {
    let prefix = content.path.get_prefix();

    let metadata = fs::metadata(&prefix)
        .await
        .with_context(|| format!("Content directory for {} is missing", content.path))?;
    if !metadata.is_dir() {
        bail!("{} is not a directory", prefix.display());
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(&prefix).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", prefix.display()))?;
        if entry.file_type().is_file() && content.path.is_match(entry.path()) {
            entries.push(entry.into_path());
        }
    }

    let mut posts = BTreeMap::<String, Post>::new();

    for path in entries {
        let source = fs::read_to_string(&path).await?;
        let rel_path = path.strip_prefix(&prefix).unwrap_or(&path);

        let post = Post::parse(&source, rel_path, path.clone())
            .with_context(|| format!("Failed to read post {}", path.display()))?;

        if post.draft && !content.include_drafts {
            debug!("Skipping draft {}", path.display());
            continue;
        }

        if let Some(existing) = posts.get(&post.slug) {
            bail!(
                "Posts {} and {} both have the slug \"{}\"",
                existing.path.display(),
                path.display(),
                post.slug
            );
        }

        posts.insert(post.slug.clone(), post);
    }

    debug!("Found {} posts matching {}", posts.len(), content.path);

    Ok(posts.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glob::Glob;
    use assert_fs::{prelude::*, TempDir};

    fn content(dir: &TempDir, include_drafts: bool) -> Content {
        let pattern = format!("{}/posts/**/*.md", dir.path().display());
        Content {
            path: Glob::new(&pattern).unwrap(),
            include_drafts,
        }
    }

    fn write_post(dir: &TempDir, path: &str, front_matter: &str) {
        dir.child("posts")
            .child(path)
            .write_str(&format!("---\n{front_matter}\n---\nBody\n"))
            .unwrap();
    }

    #[tokio::test]
    async fn collects_matching_posts_sorted_by_slug() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "b.md", "title: B\npublishDate: 2024-01-02");
        write_post(&dir, "nested/a.md", "title: A\npublishDate: 2024-01-01");
        dir.child("posts/notes.txt").write_str("ignored").unwrap();

        let posts = collect(&content(&dir, false)).await.unwrap();
        let slugs = posts.iter().map(|p| p.slug.as_str()).collect::<Vec<_>>();

        assert_eq!(slugs, ["b", "nested/a"]);
    }

    #[tokio::test]
    async fn drafts_are_opt_in() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "live.md", "title: Live\npublishDate: 2024-01-01");
        write_post(&dir, "wip.md", "title: WIP\npublishDate: 2024-01-01\ndraft: true");

        assert_eq!(collect(&content(&dir, false)).await.unwrap().len(), 1);
        assert_eq!(collect(&content(&dir, true)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_slugs_fail() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "one.md", "title: One\npublishDate: 2024-01-01\nslug: same");
        write_post(&dir, "two.md", "title: Two\npublishDate: 2024-01-01\nslug: same");

        let err = collect(&content(&dir, false)).await.unwrap_err();
        assert!(err.to_string().contains("same"));
    }

    #[tokio::test]
    async fn malformed_post_names_the_file() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "broken.md", "title: Broken");

        let err = collect(&content(&dir, false)).await.unwrap_err();
        assert!(format!("{err:#}").contains("broken.md"));
    }

    #[tokio::test]
    async fn empty_collection_is_fine() {
        let dir = TempDir::new().unwrap();
        dir.child("posts").create_dir_all().unwrap();
        assert!(collect(&content(&dir, false)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_content_directory_fails() {
        let dir = TempDir::new().unwrap();

        let err = collect(&content(&dir, false)).await.unwrap_err();
        assert!(format!("{err:#}").contains("posts/**/*.md"));
    }
}
