//! Tree object
//!
//! Trees represent directory snapshots. They contain entries for files (blobs)
//! and subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! Entries are emitted in byte order of their names, so a tree's digest depends only on
//! the set of entries it holds.
//!
//! ## Tree Building
//!
//! Trees can be built from:
//! - Index entries (staging area), producing nested sub-trees for every directory
//! - Stored tree objects (for reading)

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
enum TreeEntry {
    /// Reference to an already stored object (a blob, or a sub-tree read from disk)
    Stored(DatabaseEntry),
    /// Sub-tree still being built from the index
    Directory(Tree),
}

impl TreeEntry {
    fn mode(&self) -> EntryMode {
        match self {
            TreeEntry::Stored(entry) => entry.mode,
            TreeEntry::Directory(_) => EntryMode::Directory,
        }
    }

    fn oid(&self) -> anyhow::Result<ObjectId> {
        match self {
            TreeEntry::Stored(entry) => Ok(entry.oid.clone()),
            TreeEntry::Directory(tree) => tree.object_id(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Build a nested tree from index entries
    ///
    /// Each entry's path is split into segments; every intermediate segment becomes a
    /// directory entry owning its own sub-tree.
    pub fn build<'e>(entries: impl IntoIterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for entry in entries {
            let parents = entry.parent_segments()?;
            root.add_entry(&parents, entry)?;
        }

        Ok(root)
    }

    /// Visit every sub-tree depth-first, children before parents
    ///
    /// Child digests must be stored before the parent that embeds them, which is why
    /// this is a post-order traversal.
    pub fn traverse<F>(&self, func: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&Tree) -> anyhow::Result<()>,
    {
        for entry in self.entries.values() {
            if let TreeEntry::Directory(tree) = entry {
                tree.traverse(func)?;
            }
        }
        func(self)
    }

    fn add_entry(&mut self, parents: &[&str], entry: &IndexEntry) -> anyhow::Result<()> {
        match parents.split_first() {
            None => {
                self.entries.insert(
                    entry.basename()?.to_string(),
                    TreeEntry::Stored(DatabaseEntry::new(entry.oid.clone(), entry.metadata.mode)),
                );
            }
            Some((parent, rest)) => {
                let slot = self
                    .entries
                    .entry(parent.to_string())
                    .or_insert_with(|| TreeEntry::Directory(Tree::default()));

                match slot {
                    TreeEntry::Directory(tree) => tree.add_entry(rest, entry)?,
                    TreeEntry::Stored(_) => anyhow::bail!(
                        "{} is both a file and a directory",
                        entry.name.display()
                    ),
                }
            }
        }

        Ok(())
    }

    /// Entries of a tree read back from the database
    ///
    /// Sub-trees still being built are skipped.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &DatabaseEntry)> {
        self.entries.iter().filter_map(|(name, entry)| match entry {
            TreeEntry::Stored(entry) => Some((name, entry)),
            TreeEntry::Directory(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content = Vec::new();

        for (name, tree_entry) in &self.entries {
            write!(content, "{} {}", tree_entry.mode(), name)?;
            content.push(0);
            tree_entry.oid()?.write_h40_to(&mut content)?;
        }

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut reader = reader;

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                anyhow::bail!("unexpected EOF in mode");
            }

            let mode = EntryMode::try_from(std::str::from_utf8(&mode_bytes)?)?;

            // Read "name\0"
            name_bytes.clear();
            let n = reader.read_until(b'\0', &mut name_bytes)?;
            if n == 0 || name_bytes.pop() != Some(b'\0') {
                anyhow::bail!("unexpected EOF in name");
            }
            let name = std::str::from_utf8(&name_bytes)?.to_owned();

            let oid =
                ObjectId::read_h40_from(&mut reader).context("unexpected EOF in object id")?;

            if entries
                .insert(name.clone(), TreeEntry::Stored(DatabaseEntry::new(oid, mode)))
                .is_some()
            {
                anyhow::bail!("duplicate tree entry {name}");
            }
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}
