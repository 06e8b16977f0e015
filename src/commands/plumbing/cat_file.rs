use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use std::io::Write;

impl Repository {
    /// Raw content of `object_id`, checked against `expected` when given
    pub fn get_object(
        &self,
        object_id: &ObjectId,
        expected: Option<ObjectType>,
    ) -> anyhow::Result<Bytes> {
        self.database().load(object_id, expected)
    }

    pub fn cat_file(&self, name: &str, expected: Option<ObjectType>) -> anyhow::Result<()> {
        let object_id = self.resolve(name)?;
        let content = self.get_object(&object_id, expected)?;

        let mut writer = self.writer();
        writer.write_all(&content)?;
        writer.flush()?;

        Ok(())
    }
}
