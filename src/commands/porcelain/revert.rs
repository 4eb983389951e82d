use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RevError;

impl Repository {
    /// Reset the working directory and index to a past commit and detach head onto it
    ///
    /// Every currently indexed file is removed from disk before the commit's tree is
    /// checked out, so uncommitted changes to tracked files are lost. Untracked files
    /// are left in place.
    pub fn revert(&self, target: &str) -> anyhow::Result<ObjectId> {
        let commit_id = ObjectId::try_parse(target)?;
        if !self.database().contains(&commit_id) {
            return Err(RevError::RevertTargetInvalid(commit_id.to_string()).into());
        }
        let commit = self.database().load_commit(&commit_id)?;

        let _lock = self.lock()?;

        // plan before touching the disk so a broken tree fails early
        let migration = Migration::plan(self.database(), commit.tree_oid())?;

        let mut index = self.index()?;
        for entry in index.entries() {
            self.workspace().remove_file(&entry.name)?;
        }

        migration.apply(self.workspace())?;

        let entries = migration
            .into_files()
            .into_iter()
            .map(|(path, entry)| {
                let stat = self.workspace().stat_file(&path)?;
                Ok(IndexEntry::new(
                    path,
                    entry.oid,
                    EntryMetadata::new(entry.mode, stat.mtime),
                ))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        index.replace(entries);
        index.save()?;

        self.refs().detach(&commit_id)?;
        tracing::info!(oid = %commit_id, files = index.len(), "reverted working directory");

        Ok(commit_id)
    }
}
