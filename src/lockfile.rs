use crate::hash::Hash;
use anyhow::bail;
use fs_err::tokio as fs;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LockfileEntry {
    pub hash: Hash,
}

pub const CURRENT_VERSION: u32 = 1;
pub const FILE_NAME: &str = "ogimage.lock.toml";

/// Records which image each slug was last rendered from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Lockfile {
    version: u32,
    #[serde(default)]
    images: BTreeMap<String, LockfileEntry>,
}

impl Default for Lockfile {
    fn default() -> Self {
        Lockfile {
            version: CURRENT_VERSION,
            images: BTreeMap::new(),
        }
    }
}

impl Lockfile {
    pub async fn read(path: &Path) -> anyhow::Result<Self> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Lockfile::default())
            }
            Err(err) => return Err(err.into()),
        };

        let parsed: Lockfile = toml::from_str(&content)?;
        if parsed.version != CURRENT_VERSION {
            bail!(
                "Unsupported lockfile version {} in {}",
                parsed.version,
                path.display()
            );
        }

        Ok(parsed)
    }

    pub fn get(&self, slug: &str) -> Option<&LockfileEntry> {
        self.images.get(slug)
    }

    pub fn insert(&mut self, slug: &str, entry: LockfileEntry) {
        self.images.insert(slug.to_string(), entry);
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }

    pub async fn write(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string(self)?;
        fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::{prelude::*, TempDir};

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let lockfile = Lockfile::read(dir.child(FILE_NAME).path()).await.unwrap();
        assert_eq!(lockfile, Lockfile::default());
    }

    #[tokio::test]
    async fn written_entries_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.child(FILE_NAME);

        let mut lockfile = Lockfile::default();
        let hash = Hash::new_from_parts(&[b"image".as_slice()]);
        lockfile.insert("2024/hello", LockfileEntry { hash });
        lockfile.write(path.path()).await.unwrap();

        let read = Lockfile::read(path.path()).await.unwrap();
        assert_eq!(read.get("2024/hello"), Some(&LockfileEntry { hash }));
        assert_eq!(read.slugs().collect::<Vec<_>>(), ["2024/hello"]);
    }

    #[tokio::test]
    async fn unknown_version_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.child(FILE_NAME);
        path.write_str("version = 99\n").unwrap();

        assert!(Lockfile::read(path.path()).await.is_err());
    }
}
