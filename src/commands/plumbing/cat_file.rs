use crate::areas::repository::Repository;
use crate::artifacts::objects::object::RawObject;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Kind and payload of any stored object
    pub fn cat_file(&self, object_id: &str) -> anyhow::Result<RawObject> {
        let object_id = ObjectId::try_parse(object_id)?;

        self.database().get(&object_id)
    }
}
