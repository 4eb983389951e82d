use crate::areas::workspace::Workspace;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;

/// Compares staged entries with the files currently on disk
#[derive(new)]
pub struct Inspector<'r> {
    workspace: &'r Workspace,
}

impl<'r> Inspector<'r> {
    // mtime is never trusted as a shortcut, content is always re-hashed
    fn is_content_changed(&self, index_entry: &IndexEntry) -> anyhow::Result<bool> {
        let data = self.workspace.read_file(&index_entry.name)?;
        let oid = ObjectId::compute(ObjectType::Blob, &data);

        Ok(oid != index_entry.oid)
    }

    /// `None` when the file on disk still matches the staged blob
    pub fn check_index_against_workspace(
        &self,
        index_entry: &IndexEntry,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        if !self.workspace.is_file(&index_entry.name) {
            return Ok(Some(WorkspaceChangeType::Deleted));
        }

        if self.is_content_changed(index_entry)? {
            return Ok(Some(WorkspaceChangeType::Modified));
        }

        Ok(None)
    }
}
