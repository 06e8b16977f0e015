use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Replace the working directory with the content of `tree_oid`
    ///
    /// Everything outside the metadata directory is removed first, untracked
    /// files included. Nothing is touched if the tree cannot be fully read.
    pub fn read_tree(&self, tree_oid: &ObjectId) -> anyhow::Result<()> {
        let migration = Migration::plan(self.database(), self.workspace(), tree_oid)?;
        self.workspace().apply_migration(&migration)?;

        tracing::debug!(tree = %tree_oid, "working directory restored");

        Ok(())
    }
}
