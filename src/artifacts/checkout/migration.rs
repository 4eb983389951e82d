//! Checkout planning
//!
//! A migration materializes a stored tree onto disk in two steps:
//!
//! 1. Plan: walk the tree and collect the directories to create and the files to write
//! 2. Apply: create the directories parents first, then write every blob
//!
//! Existing files at planned paths are overwritten; nothing else on disk is touched.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub struct Migration<'r> {
    database: &'r Database,
    /// Directories to create
    mkdirs: BTreeSet<PathBuf>,
    /// Files to write, mapped to the blob they hold
    files: BTreeMap<PathBuf, DatabaseEntry>,
}

impl<'r> Migration<'r> {
    pub fn plan(database: &'r Database, tree_id: &ObjectId) -> anyhow::Result<Self> {
        let mut mkdirs = BTreeSet::new();
        let mut files = BTreeMap::new();

        database.walk_tree(tree_id, &mut |path: &Path, entry: &DatabaseEntry| {
            if entry.is_tree() {
                mkdirs.insert(path.to_path_buf());
            } else {
                files.insert(path.to_path_buf(), entry.clone());
            }
            Ok(())
        })?;

        Ok(Migration {
            database,
            mkdirs,
            files,
        })
    }

    pub fn into_files(self) -> BTreeMap<PathBuf, DatabaseEntry> {
        self.files
    }

    // sorted paths put every parent before its children
    pub fn apply(&self, workspace: &Workspace) -> anyhow::Result<()> {
        for dir_path in &self.mkdirs {
            workspace.make_directory(dir_path)?;
        }

        for (file_path, entry) in &self.files {
            let blob = self.database.load_blob(&entry.oid)?;
            workspace.write_file(file_path, blob.content(), entry.mode)?;
        }

        tracing::debug!(
            directories = self.mkdirs.len(),
            files = self.files.len(),
            root = %workspace.path().display(),
            "checked out tree"
        );

        Ok(())
    }
}
