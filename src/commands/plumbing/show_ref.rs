use crate::areas::refs::RefTarget;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::SymRefName;
use std::io::Write;

impl Repository {
    /// Read-only enumeration of HEAD and every ref under `refs/`
    pub fn iterate_refs<'a>(
        &'a self,
        prefix: Option<&'a str>,
        deref: bool,
    ) -> impl Iterator<Item = anyhow::Result<(SymRefName, RefTarget)>> + 'a {
        self.refs().iter_refs(prefix, deref)
    }

    pub fn show_ref(&self, prefix: Option<&str>, deref: bool) -> anyhow::Result<()> {
        for entry in self.iterate_refs(prefix, deref) {
            let (name, target) = entry?;
            writeln!(self.writer(), "{target} {name}")?;
        }

        Ok(())
    }
}
