use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Create `refs/heads/<name>` pointing at the commit `start_oid`
    pub fn create_branch(&self, name: &str, start_oid: &ObjectId) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(name.to_string())?;

        // a branch can only start from a commit
        self.database()
            .load(start_oid, Some(ObjectType::Commit))?;

        self.refs().create_branch(&branch_name, start_oid.clone())?;
        tracing::info!(branch = %branch_name, oid = %start_oid, "created branch");

        Ok(())
    }

    pub fn branch(&self, name: &str, start: Option<&str>) -> anyhow::Result<()> {
        let start_oid = self.resolve(start.unwrap_or("@"))?;
        self.create_branch(name, &start_oid)?;

        writeln!(
            self.writer(),
            "Branch {name} created at {}",
            start_oid.to_short_oid()
        )?;

        Ok(())
    }

    /// Print every branch, marking the one HEAD is attached to
    pub fn list_branches(&self) -> anyhow::Result<()> {
        let current_branch = self.refs().current_branch()?;

        if current_branch.is_none()
            && let Some(head_oid) = self.refs().read_head()?
        {
            let detached = format!("(HEAD detached at {})", head_oid.to_short_oid());
            writeln!(self.writer(), "* {}", detached.green())?;
        }

        for branch in self.refs().list_branches()? {
            if current_branch.as_ref() == Some(&branch) {
                writeln!(self.writer(), "* {}", branch.to_string().green())?;
            } else {
                writeln!(self.writer(), "  {branch}")?;
            }
        }

        Ok(())
    }
}
