use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::{TempDir, fixture::ChildPath, prelude::*};

pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn write_config(&self, contents: toml::Table) {
        self.dir
            .child("ogimage.toml")
            .write_str(&contents.to_string())
            .unwrap();
    }

    /// Writes a markdown post under `content/` with YAML front matter.
    pub fn add_post(&self, path: &str, front_matter: &str) -> ChildPath {
        let file = self.dir.child("content").child(path);
        file.write_str(&format!("---\n{front_matter}\n---\n\nBody text.\n"))
            .unwrap();
        file
    }

    pub fn image(&self, slug: &str) -> ChildPath {
        self.dir.child(format!("dist/og-image/{slug}.png"))
    }

    pub fn run(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!();
        cmd.current_dir(self.dir.path());
        cmd
    }
}
