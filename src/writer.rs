//! Output sink for generated files.

use crate::error::{Error, Result};
use log::debug;
use std::path::PathBuf;

/// Writes generated files into the output directory.
#[derive(Debug)]
pub struct OutputWriter {
    output_dir: PathBuf,
}

impl OutputWriter {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self { output_dir: output_dir.into() }
    }

    /// Target path for a generated file name.
    pub fn target_path(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }

    /// Writes `content` to `filename` inside the output directory, replacing
    /// any existing file. Does nothing on disk when `dry_run` is set.
    ///
    /// # Errors
    /// * `Error::WriteError` if the directory cannot be created or the file
    ///   cannot be written
    pub fn write(&self, filename: &str, content: &str, dry_run: bool) -> Result<PathBuf> {
        let target = self.target_path(filename);
        if dry_run {
            debug!("Dry run, skipping write of {}", target.display());
            return Ok(target);
        }

        let to_write_error =
            |e: std::io::Error| Error::WriteError { path: target.display().to_string(), e: e.to_string() };
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(to_write_error)?;
        }
        std::fs::write(&target, content).map_err(to_write_error)?;

        debug!("Wrote {}", target.display());
        Ok(target)
    }
}
