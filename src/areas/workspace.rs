//! Working directory
//!
//! All paths handed in and out of the workspace are relative to the work tree root.
//! The repository directory itself is never listed.

use crate::REPOSITORY_DIR;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::{EntryMetadata, validate_entry_path};
use crate::errors::RevError;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Join a relative path onto the work tree, refusing anything that could leave it
    fn full_path(&self, file_path: &Path) -> anyhow::Result<PathBuf> {
        let confined = file_path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !confined || Self::is_ignored(file_path) {
            return Err(RevError::PathOutsideRepository(file_path.to_path_buf()).into());
        }

        Ok(self.path.join(file_path))
    }

    fn is_ignored(path: &Path) -> bool {
        matches!(
            path.components().next(),
            Some(Component::Normal(name)) if name == REPOSITORY_DIR
        )
    }

    /// Every regular file under the work tree, sorted by path
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry
                    .path()
                    .strip_prefix(&self.path)
                    .map(|relative| !Self::is_ignored(relative))
                    .unwrap_or(true)
            });

        for entry in walker {
            let entry = entry
                .with_context(|| format!("Unable to walk work tree {}", self.path.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            files.push(entry.path().strip_prefix(&self.path)?.to_path_buf());
        }
        files.sort();

        Ok(files)
    }

    /// Validate a staging input and return it relative to the work tree
    ///
    /// Relative inputs are resolved against the work tree root.
    pub fn resolve_stage_path(&self, path: &Path) -> anyhow::Result<PathBuf> {
        let absolute = self.path.join(path);

        let metadata = std::fs::metadata(&absolute)
            .map_err(|_| RevError::PathNotFound(path.to_path_buf()))?;
        if metadata.is_dir() {
            return Err(RevError::PathIsDirectory(path.to_path_buf()).into());
        }

        let root = std::fs::canonicalize(&self.path)
            .with_context(|| format!("Unable to resolve {}", self.path.display()))?;
        let absolute = std::fs::canonicalize(&absolute)
            .with_context(|| format!("Unable to resolve {}", absolute.display()))?;

        let relative = match absolute.strip_prefix(&root) {
            Ok(relative) if !Self::is_ignored(relative) => relative,
            _ => return Err(RevError::PathOutsideRepository(path.to_path_buf()).into()),
        };
        validate_entry_path(relative)?;

        Ok(relative.to_path_buf())
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.full_path(file_path)?;
        let content = std::fs::read(&full_path)
            .with_context(|| format!("Unable to read {}", full_path.display()))?;

        Ok(content.into())
    }

    pub fn stat_file(&self, file_path: &Path) -> anyhow::Result<EntryMetadata> {
        let full_path = self.full_path(file_path)?;
        let metadata = std::fs::metadata(&full_path)
            .with_context(|| format!("Unable to stat {}", full_path.display()))?;

        (full_path.as_path(), metadata).try_into()
    }

    pub fn is_file(&self, file_path: &Path) -> bool {
        self.full_path(file_path).is_ok_and(|path| path.is_file())
    }

    pub fn make_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        let full_path = self.full_path(dir_path)?;
        std::fs::create_dir_all(&full_path)
            .with_context(|| format!("Unable to create directory {}", full_path.display()))
    }

    /// Write a checked-out file, replacing whatever content it had
    pub fn write_file(&self, file_path: &Path, data: &[u8], mode: EntryMode) -> anyhow::Result<()> {
        let full_path = self.full_path(file_path)?;
        if let Some(parent) = file_path.parent() {
            self.make_directory(parent)?;
        }

        std::fs::write(&full_path, data)
            .with_context(|| format!("Unable to write {}", full_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(mode.permissions());
            std::fs::set_permissions(&full_path, permissions).with_context(|| {
                format!("Unable to set permissions on {}", full_path.display())
            })?;
        }
        #[cfg(not(unix))]
        let _ = mode;

        Ok(())
    }

    /// Remove a file if present, then every parent directory it leaves empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.full_path(file_path)?;
        if full_path.is_file() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("Unable to remove {}", full_path.display()))?;
        }

        for parent in file_path.ancestors().skip(1) {
            if parent.as_os_str().is_empty() {
                break;
            }

            let dir_path = self.path.join(parent);
            let is_empty = std::fs::read_dir(&dir_path)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if !is_empty {
                break;
            }

            std::fs::remove_dir(&dir_path)
                .with_context(|| format!("Unable to remove directory {}", dir_path.display()))?;
        }

        Ok(())
    }
}
