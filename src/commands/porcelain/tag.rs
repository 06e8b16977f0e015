use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Create `refs/tags/<name>` pointing at an existing object of any kind
    pub fn create_tag(&self, name: &str, object_id: &ObjectId) -> anyhow::Result<()> {
        let tag_name = BranchName::try_parse(name.to_string())?;

        // fails with ObjectNotFound for a dangling target
        self.database().object_type(object_id)?;

        self.refs().create_tag(&tag_name, object_id.clone())?;
        tracing::info!(tag = %tag_name, oid = %object_id, "created tag");

        Ok(())
    }

    pub fn tag(&self, name: &str, target: Option<&str>) -> anyhow::Result<()> {
        let object_id = self.resolve(target.unwrap_or("@"))?;

        self.create_tag(name, &object_id)
    }
}
