use crate::DEFAULT_BRANCH;
use crate::areas::refs::RefTarget;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    /// Create the metadata directory and attach HEAD to the (not yet
    /// existing) default branch
    ///
    /// Running it again on an initialized repository only fills in missing
    /// directories; HEAD and existing refs are left alone.
    pub fn init(&self) -> anyhow::Result<()> {
        let reinitialized = self.is_initialized();

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .dagit/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .dagit/refs/heads directory")?;

        fs::create_dir_all(self.refs().tags_path())
            .context("Failed to create .dagit/refs/tags directory")?;

        if !reinitialized {
            let default_branch = BranchName::try_parse(DEFAULT_BRANCH.to_string())?;
            self.refs()
                .set_head(RefTarget::Symbolic(SymRefName::branch(&default_branch)))
                .context("Failed to create initial HEAD reference")?;
        }

        tracing::info!(path = %self.path().display(), reinitialized, "repository initialized");

        writeln!(
            self.writer(),
            "{} dagit repository in {}",
            if reinitialized {
                "Reinitialized existing"
            } else {
                "Initialized empty"
            },
            self.metadata_path().display()
        )?;

        Ok(())
    }
}
