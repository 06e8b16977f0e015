use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Store `data` as a blob
    pub fn hash_object(&self, data: Bytes) -> anyhow::Result<ObjectId> {
        self.database().put(ObjectType::Blob, data)
    }

    /// Store the content of `file_path` (relative to the working directory
    /// root) as a blob and print its ID
    pub fn hash_file(&self, file_path: &Path) -> anyhow::Result<ObjectId> {
        let data = self.workspace().read_file(file_path)?;
        let object_id = self.hash_object(data)?;

        writeln!(self.writer(), "{object_id}")?;

        Ok(object_id)
    }
}
