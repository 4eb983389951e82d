use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RevError;

impl Repository {
    /// Direct entries of a tree, or of the tree a commit points at
    pub fn ls_tree(&self, object_id: &str) -> anyhow::Result<Vec<(String, DatabaseEntry)>> {
        let oid = ObjectId::try_parse(object_id)?;

        let tree_oid = match self.database().get(&oid)?.kind {
            ObjectType::Commit => self.database().tree_of(&oid)?,
            ObjectType::Tree => oid,
            ObjectType::Blob => return Err(RevError::NotATree(oid.to_string()).into()),
        };

        Ok(self
            .database()
            .load_tree(&tree_oid)?
            .entries()
            .map(|(name, entry)| (name.clone(), entry.clone()))
            .collect())
    }
}
