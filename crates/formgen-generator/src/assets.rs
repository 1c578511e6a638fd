//! Asset processing and management.
//!
//! Copies the static asset tree (fonts) into the output directory, overwriting
//! files that already exist there.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};

/// Asset processing errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source directory does not exist.
    #[error("asset source directory not found: {}", .0.display())]
    MissingSource(PathBuf),

    /// The source exists but is not a directory.
    #[error("asset source is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Invalid asset path.
    #[error("invalid asset path: {}", .0.display())]
    InvalidPath(PathBuf),
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Files copied by one asset run, relative to the source directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetManifest {
    files: Vec<PathBuf>,
}

impl AssetManifest {
    /// Create a new empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a copied file.
    pub fn add(&mut self, relative: impl Into<PathBuf>) {
        self.files.push(relative.into());
    }

    /// Copied files, sorted.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Number of copied files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing was copied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check whether a relative path was copied.
    #[must_use]
    pub fn contains(&self, relative: &Path) -> bool {
        self.files.iter().any(|f| f == relative)
    }
}

/// Recursive asset copier.
#[derive(Debug, Clone)]
pub struct AssetProcessor {
    /// Whether dot-files and dot-directories are skipped.
    skip_hidden: bool,
}

impl Default for AssetProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetProcessor {
    /// Create a new asset processor that copies every entry verbatim.
    #[must_use]
    pub fn new() -> Self {
        Self { skip_hidden: false }
    }

    /// Set whether dot-files and dot-directories are skipped.
    #[must_use]
    pub fn with_skip_hidden(mut self, skip_hidden: bool) -> Self {
        self.skip_hidden = skip_hidden;
        self
    }

    /// Copy all assets from source to destination directory.
    pub fn process(&self, source_dir: &Path, dest_dir: &Path) -> Result<AssetManifest> {
        info!(
            source = %source_dir.display(),
            dest = %dest_dir.display(),
            "copying assets"
        );

        if !source_dir.exists() {
            return Err(AssetError::MissingSource(source_dir.to_path_buf()));
        }
        if !source_dir.is_dir() {
            return Err(AssetError::NotADirectory(source_dir.to_path_buf()));
        }

        let mut manifest = AssetManifest::new();
        Self::ensure_dir(dest_dir)?;
        self.process_dir(source_dir, source_dir, dest_dir, &mut manifest)?;
        manifest.files.sort();

        info!(count = manifest.len(), "assets copied");
        Ok(manifest)
    }

    /// Recursively process a directory.
    fn process_dir(
        &self,
        base_dir: &Path,
        current_dir: &Path,
        dest_base: &Path,
        manifest: &mut AssetManifest,
    ) -> Result<()> {
        for entry in fs::read_dir(current_dir)? {
            let entry = entry?;
            let path = entry.path();

            if self.skip_hidden
                && path
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with('.'))
            {
                continue;
            }

            if path.is_dir() {
                self.process_dir(base_dir, &path, dest_base, manifest)?;
            } else if path.is_file() {
                Self::copy_file(base_dir, &path, dest_base, manifest)?;
            }
        }

        Ok(())
    }

    /// Copy a single file.
    fn copy_file(
        base_dir: &Path,
        file_path: &Path,
        dest_base: &Path,
        manifest: &mut AssetManifest,
    ) -> Result<()> {
        let relative = file_path
            .strip_prefix(base_dir)
            .map_err(|_| AssetError::InvalidPath(file_path.to_path_buf()))?;

        let dest_path = dest_base.join(relative);

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::copy(file_path, &dest_path)?;
        manifest.add(relative);

        debug!(
            src = %file_path.display(),
            dest = %dest_path.display(),
            "copied asset"
        );

        Ok(())
    }

    /// Create a directory if it doesn't exist.
    pub fn ensure_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }
}
