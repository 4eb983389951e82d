//! Index (staging area)
//!
//! The index tracks which blob every staged path should contribute to the next commit.
//! It is a plain text file with one `<mode> <digest> <mtime> <path>` line per entry.
//!
//! ## Lifecycle
//!
//! - Upserted one entry at a time when files are staged
//! - Promoted into a tree at commit time
//! - Fully rewritten by revert to mirror the checked-out tree
//! - Read, never written, by status

use crate::artifacts::core::write_atomically;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::{Packable, Unpackable};
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.rev/index`)
    path: Box<Path>,
    /// Staged files mapped by path
    entries: BTreeMap<PathBuf, IndexEntry>,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn is_tracked(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    /// Load the index from disk
    ///
    /// A missing file is an empty index. Lines that fail to parse are skipped with a
    /// warning rather than invalidating the whole staging area.
    pub fn load(&mut self) -> anyhow::Result<()> {
        self.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let content = std::fs::read(&self.path)
            .with_context(|| format!("Unable to read index file {}", self.path.display()))?;

        for (line_number, line) in content.split(|byte| *byte == b'\n').enumerate() {
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match IndexEntry::deserialize(line) {
                Ok(entry) => {
                    self.entries.insert(entry.name.clone(), entry);
                }
                Err(error) => {
                    tracing::warn!(
                        line = line_number + 1,
                        %error,
                        "skipping malformed index line"
                    );
                }
            }
        }

        Ok(())
    }

    /// Drop entries that cannot coexist with `entry` in a tree
    ///
    /// Those are staged files sitting where `entry` needs a parent directory, and staged
    /// files underneath `entry`'s own path.
    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        for parent in entry.parent_dirs() {
            if self.entries.remove(parent).is_some() {
                tracing::debug!(path = %parent.display(), "unstaged file shadowed by a directory");
            }
        }

        self.entries.retain(|path, _| {
            let shadowed = path != &entry.name && path.starts_with(&entry.name);
            if shadowed {
                tracing::debug!(path = %path.display(), "unstaged file shadowed by a file");
            }
            !shadowed
        });
    }

    /// Insert or replace the entry for `entry.name`, leaving unrelated entries untouched
    pub fn stage(&mut self, entry: IndexEntry) {
        self.discard_conflicts(&entry);
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Replace the whole entry set
    pub fn replace(&mut self, entries: impl IntoIterator<Item = IndexEntry>) {
        self.entries = entries
            .into_iter()
            .map(|entry| (entry.name.clone(), entry))
            .collect();
    }

    /// Rewrite the index file from the in-memory entries, one line per path
    pub fn save(&mut self) -> anyhow::Result<()> {
        let mut content = Vec::new();
        for entry in self.entries.values() {
            content.extend_from_slice(&entry.serialize()?);
        }

        write_atomically(&self.path, &content)
            .with_context(|| format!("Unable to write index file {}", self.path.display()))?;
        tracing::debug!(entries = self.entries.len(), "index written");

        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
