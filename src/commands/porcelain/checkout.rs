use crate::areas::refs::RefTarget;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

const DETACHMENT_NOTICE: &str = r#"
You are in 'detached HEAD' state. You can look around, make experimental
changes and commit them, and you can discard any commits you make in this
state without impacting any branches by performing another checkout.

If you want to create a new branch to retain commits you create, you may
do so (now or later) by using the branch command. Example:

    dagit branch <new-branch-name>
"#;

impl Repository {
    /// Restore the commit `name` resolves to and repoint HEAD
    ///
    /// HEAD becomes `ref: refs/heads/<name>` when `name` is an existing branch
    /// and is detached at the commit otherwise.
    pub fn checkout(&self, name: &str) -> anyhow::Result<ObjectId> {
        let previous_branch = self.refs().current_branch()?;

        let commit_oid = self.resolve(name)?;
        let commit = self.get_commit(&commit_oid)?;
        self.read_tree(commit.tree_oid())?;

        let new_branch = if self.refs().is_branch(name)? {
            Some(BranchName::try_parse(name.to_string())?)
        } else {
            None
        };

        let head = match &new_branch {
            Some(branch) => RefTarget::Symbolic(SymRefName::branch(branch)),
            None => RefTarget::Direct(Some(commit_oid.clone())),
        };
        self.refs().set_head(head)?;

        tracing::info!(name, oid = %commit_oid, "checked out");

        match new_branch {
            Some(branch) if previous_branch.as_ref() == Some(&branch) => {
                writeln!(self.writer(), "Already on '{branch}'")?;
            }
            Some(branch) => {
                writeln!(self.writer(), "Switched to branch '{branch}'")?;
            }
            None => {
                if previous_branch.is_some() {
                    writeln!(
                        self.writer(),
                        "Note: switching to '{name}'.\n{DETACHMENT_NOTICE}"
                    )?;
                }
                writeln!(
                    self.writer(),
                    "HEAD is now at {} {}",
                    commit_oid.to_short_oid(),
                    commit.short_message()
                )?;
            }
        }

        Ok(commit_oid)
    }
}
