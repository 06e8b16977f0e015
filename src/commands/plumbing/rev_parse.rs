use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Turn a user-supplied name (`@`, ref, branch, tag or full hash) into an
    /// object ID
    pub fn resolve(&self, name: &str) -> anyhow::Result<ObjectId> {
        Revision::try_parse(name)?.resolve(self.refs())
    }
}
