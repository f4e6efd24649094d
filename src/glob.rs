use serde::{de, Deserialize, Deserializer};
use std::{
    fmt,
    path::{Component, Path, PathBuf},
};

/// A content glob such as `src/content/post/**/*.{md,mdx}`.
///
/// Walking starts at the longest literal directory prefix of the pattern,
/// so only that subtree is visited.
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    matcher: globset::GlobMatcher,
}

impl Glob {
    pub fn new(pattern: &str) -> anyhow::Result<Self> {
        // Walked paths are matched without their leading `./`, so the
        // pattern must not carry one either.
        let mut pattern = pattern;
        while let Some(rest) = pattern.strip_prefix("./") {
            pattern = rest.trim_start_matches('/');
        }

        let matcher = globset::GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()?
            .compile_matcher();

        Ok(Self {
            pattern: pattern.to_string(),
            matcher,
        })
    }

    pub fn is_match(&self, path: &Path) -> bool {
        let path = path.strip_prefix(".").unwrap_or(path);
        self.matcher.is_match(path)
    }

    pub fn get_prefix(&self) -> PathBuf {
        let mut prefix = PathBuf::new();
        let mut wildcard = false;

        for component in Path::new(&self.pattern).components() {
            if let Component::Normal(part) = component {
                if part.to_string_lossy().contains(['*', '?', '[', '{']) {
                    wildcard = true;
                    break;
                }
            }
            prefix.push(component);
        }

        // A pattern without wildcards names a file, so walk its parent.
        if !wildcard {
            prefix.pop();
        }

        if prefix.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            prefix
        }
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl<'de> Deserialize<'de> for Glob {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pattern = String::deserialize(deserializer)?;
        Glob::new(&pattern).map_err(de::Error::custom)
    }
}
