use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use std::path::Path;

impl Repository {
    /// Blob digest of a file, stored only when `write` is set; the index is not touched
    pub fn hash_object(&self, object_path: impl AsRef<Path>, write: bool) -> anyhow::Result<ObjectId> {
        let object_path = self.workspace().resolve_stage_path(object_path.as_ref())?;
        let blob = Blob::new(self.workspace().read_file(&object_path)?);

        if !write {
            return blob.object_id();
        }

        self.database().store(&blob)
    }
}
