#![allow(dead_code)]

use recipegen::config::{Config, ReplacementRule};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project with `templates/` and `output/` directories.
pub struct Project {
    pub dir: TempDir,
    pub config: Config,
}

impl Project {
    pub fn new(rules: Vec<ReplacementRule>) -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();

        let mut config = Config::default();
        config.output_dir = dir.path().join("output").display().to_string();
        config.template_dir = dir.path().join("templates").display().to_string();
        config.set_rules(rules);
        Self { dir, config }
    }

    /// Writes a template and appends it to the configured template list.
    pub fn template(mut self, name: &str, content: impl AsRef<[u8]>) -> Self {
        fs::write(self.dir.path().join("templates").join(name), content).unwrap();
        self.config.add_template(name);
        self
    }

    pub fn output_dir(&self) -> PathBuf {
        self.config.output_dir_path()
    }

    pub fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.output_dir().join(name)).unwrap()
    }

    /// Saves the configuration as `config.json` in the project root.
    pub fn save_config(&self) -> PathBuf {
        let path = self.dir.path().join("config.json");
        self.config.save(&path).unwrap();
        path
    }
}

/// Sorted file names directly inside `dir`; empty when it does not exist.
pub fn list_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> =
        entries.map(|e| e.unwrap().file_name().to_string_lossy().into_owned()).collect();
    names.sort();
    names
}
