//! Template model and loading.
//! A template is a text file whose name and content contain `{placeholder}`
//! tokens.

use crate::constants::{RESERVED_PLACEHOLDERS, TEMPLATE_PATTERN};
use crate::error::{Error, Result};
use globset::Glob;
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid")
});

/// Returns placeholder names in order of first occurrence, without duplicates.
pub fn extract_placeholders(text: &str) -> IndexSet<String> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// A loaded template. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    path: PathBuf,
    content: String,
    placeholders: IndexSet<String>,
}

impl Template {
    /// Reads the template at `path`.
    ///
    /// # Errors
    /// * `Error::TemplateNotFound` if the file does not exist
    /// * `Error::TemplateEncodingError` if the content is not valid UTF-8
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                Error::TemplateNotFound { path: path.display().to_string() }
            }
            _ => Error::IoError(e),
        })?;
        let content = String::from_utf8(bytes)
            .map_err(|_| Error::TemplateEncodingError { path: path.display().to_string() })?;
        Ok(Self::new(path, content))
    }

    /// Builds a template from in-memory content.
    pub fn new<P: Into<PathBuf>>(path: P, content: String) -> Self {
        let mut placeholders = extract_placeholders(&content);
        placeholders.retain(|name| !RESERVED_PLACEHOLDERS.contains(&name.as_str()));
        Self { path: path.into(), content, placeholders }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the template, which doubles as the output name pattern.
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Placeholders referenced by the content, excluding system placeholders.
    pub fn placeholders(&self) -> &IndexSet<String> {
        &self.placeholders
    }

    /// Placeholders of the file name in the order they appear in it.
    /// This order drives combination nesting.
    pub fn filename_placeholders(&self) -> IndexSet<String> {
        let mut placeholders = extract_placeholders(&self.filename());
        placeholders.retain(|name| !RESERVED_PLACEHOLDERS.contains(&name.as_str()));
        placeholders
    }
}

/// Loads templates from a template directory.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    template_dir: PathBuf,
}

impl TemplateLoader {
    pub fn new<P: Into<PathBuf>>(template_dir: P) -> Self {
        Self { template_dir: template_dir.into() }
    }

    /// Loads a single template by file name.
    pub fn load_single(&self, filename: &str) -> Result<Template> {
        let path = self.template_dir.join(filename);
        debug!("Loading template {}", path.display());
        Template::from_path(path)
    }

    /// Loads every listed template, skipping the ones that cannot be read.
    pub fn load_all<S: AsRef<str>>(&self, filenames: &[S]) -> IndexMap<String, Template> {
        let mut templates = IndexMap::new();
        for filename in filenames {
            let filename = filename.as_ref();
            match self.load_single(filename) {
                Ok(template) => {
                    templates.insert(filename.to_string(), template);
                }
                Err(e) => warn!("Skipping template: {}", e),
            }
        }
        templates
    }
}

/// Lists the files directly inside `dir` whose name matches `pattern`,
/// sorted by file name.
///
/// # Errors
/// * `Error::IoError` if `dir` does not exist or is not a directory
/// * `Error::GlobSetParseError` if `pattern` is not a valid glob
pub fn scan_directory<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("template directory '{}' does not exist", dir.display()),
        )));
    }
    let matcher = Glob::new(pattern)?.compile_matcher();

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            paths.push(entry.into_path());
        }
    }
    debug!("Found {} templates in {}", paths.len(), dir.display());
    Ok(paths)
}

/// Same as [`scan_directory`] with the default `*.json` pattern, returning
/// file names only.
pub fn scan_template_names<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    Ok(scan_directory(dir, TEMPLATE_PATTERN)?
        .into_iter()
        .filter_map(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .collect())
}
