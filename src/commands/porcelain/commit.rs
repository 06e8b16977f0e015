use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// Snapshot the working directory as a commit on top of HEAD
    ///
    /// HEAD is advanced through its symbolic ref, so committing on a branch
    /// moves the branch. The message is stored verbatim.
    pub fn commit(&self, message: &str) -> anyhow::Result<ObjectId> {
        let tree_oid = self.snapshot()?;
        let parent = self.refs().read_head()?;
        let is_root = if parent.is_none() {
            " (root-commit)"
        } else {
            ""
        };

        let commit = Commit::new(tree_oid, parent, message.to_string());
        let commit_oid = self.database().store(&commit)?;
        self.refs().update_head(commit_oid.clone())?;

        let branch = match self.refs().current_branch()? {
            Some(branch) => branch.to_string(),
            None => "detached HEAD".to_string(),
        };

        tracing::info!(oid = %commit_oid, %branch, "created commit");

        writeln!(
            self.writer(),
            "[{branch}{is_root} {}] {}",
            commit_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(commit_oid)
    }

    pub fn get_commit(&self, commit_oid: &ObjectId) -> anyhow::Result<Commit> {
        self.database().parse_object_as_commit(commit_oid)
    }
}
