use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Snapshot the whole working directory and print the root tree ID
    pub fn write_tree(&self) -> anyhow::Result<ObjectId> {
        let tree_oid = self.snapshot()?;

        writeln!(self.writer(), "{tree_oid}")?;

        Ok(tree_oid)
    }

    pub(crate) fn snapshot(&self) -> anyhow::Result<ObjectId> {
        Tree::write_directory(self.database(), self.workspace(), Path::new(""))
    }
}
