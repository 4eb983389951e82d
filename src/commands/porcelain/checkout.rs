use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

impl Repository {
    /// Write every file of a stored tree under `destination`
    ///
    /// Intermediate directories are created and existing files at the same paths are
    /// overwritten. Returns the file entries that were written, keyed by relative path.
    pub fn checkout(
        &self,
        tree_id: &ObjectId,
        destination: impl AsRef<Path>,
    ) -> anyhow::Result<BTreeMap<PathBuf, DatabaseEntry>> {
        let migration = Migration::plan(self.database(), tree_id)?;
        let workspace = Workspace::new(destination.as_ref().to_path_buf().into_boxed_path());
        migration.apply(&workspace)?;

        Ok(migration.into_files())
    }
}
