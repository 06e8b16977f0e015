use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::collections::HashMap;
use std::io::Write;

impl Repository {
    /// Every commit reachable from `starts`, each once, breadth first
    pub fn ancestors(&self, starts: impl IntoIterator<Item = ObjectId>) -> RevList<'_> {
        RevList::new(self.database(), starts)
    }

    /// History starting at `start`, newest first
    pub fn log(
        &self,
        start: ObjectId,
    ) -> impl Iterator<Item = anyhow::Result<(ObjectId, Commit)>> + '_ {
        self.ancestors([start])
            .map(|commit_oid| -> anyhow::Result<(ObjectId, Commit)> {
                let commit_oid = commit_oid?;
                let commit = self.get_commit(&commit_oid)?;
                Ok((commit_oid, commit))
            })
    }

    /// Print the history of `name`, decorating commits with the refs that
    /// point at them
    pub fn show_log(&self, name: &str) -> anyhow::Result<()> {
        let start = self.resolve(name)?;
        let reverse_refs = self.refs().reverse_refs()?;
        let current_branch = self.refs().current_branch()?;

        for entry in self.log(start) {
            let (commit_oid, commit) = entry?;
            let decoration =
                Self::commit_decoration(&reverse_refs, current_branch.as_ref(), &commit_oid);

            let mut writer = self.writer();
            writeln!(
                writer,
                "{}{decoration}",
                format!("commit {commit_oid}").yellow()
            )?;
            writeln!(writer)?;
            for message_line in commit.message().lines() {
                writeln!(writer, "    {message_line}")?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }

    // ` (HEAD -> master, feature, tag: v1)` style suffix, empty when nothing
    // points at the commit
    fn commit_decoration(
        reverse_refs: &HashMap<ObjectId, Vec<SymRefName>>,
        current_branch: Option<&BranchName>,
        commit_oid: &ObjectId,
    ) -> String {
        let Some(ref_names) = reverse_refs.get(commit_oid) else {
            return String::new();
        };

        let head = SymRefName::head();
        let attached_here = current_branch
            .map(SymRefName::branch)
            .filter(|branch_ref| ref_names.contains(branch_ref));

        let mut labels = Vec::new();
        if let Some(branch_ref) = &attached_here {
            labels.push(format!("{} -> {}", "HEAD".cyan().bold(), ref_name_label(branch_ref)));
        }
        labels.extend(
            ref_names
                .iter()
                .filter(|ref_name| {
                    attached_here.is_none()
                        || (**ref_name != head && Some(*ref_name) != attached_here.as_ref())
                })
                .map(ref_name_label),
        );
        let names = labels.join(", ");

        format!(" ({names})")
    }
}

fn ref_name_label(ref_name: &SymRefName) -> String {
    if let Some(branch) = ref_name.branch_name() {
        branch.green().bold().to_string()
    } else if let Some(tag) = ref_name.tag_name() {
        format!("tag: {tag}").yellow().bold().to_string()
    } else {
        ref_name.to_string().cyan().bold().to_string()
    }
}
