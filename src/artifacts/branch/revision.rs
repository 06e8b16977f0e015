use crate::areas::refs::Refs;
use crate::artifacts::branch::REF_ALIASES;
use crate::artifacts::branch::branch_name::SymRefName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::DagitError;

/// A user-supplied name for an object.
///
/// Supported forms:
/// - `@` (alias for `HEAD`)
/// - Any ref, looked up in order as `<name>`, `refs/<name>`, `refs/tags/<name>`
///   and `refs/heads/<name>`
/// - Full OIDs: 40-character hexadecimal strings, used only when no ref matches
///
/// # Resolution Strategy
///
/// A candidate ref wins as soon as its *raw* value is present, even if it is a
/// symbolic ref whose target does not exist yet. Such a ref resolves to
/// [`DagitError::EmptyRef`] instead of falling through to a same-named hash.
/// Refs are always preferred over object IDs when both could match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(String);

impl Revision {
    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        if revision.is_empty() {
            anyhow::bail!(DagitError::UnknownName(revision.to_string()));
        }

        let revision = REF_ALIASES.get(revision).copied().unwrap_or(revision);

        Ok(Revision(revision.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn resolve(&self, refs: &Refs) -> anyhow::Result<ObjectId> {
        for candidate in self.candidate_refs() {
            if refs.get_ref(&candidate, false)?.is_absent() {
                continue;
            }

            tracing::trace!(name = %self.0, matched = %candidate, "name matched a ref");
            return refs
                .get_ref(&candidate, true)?
                .into_oid()
                .ok_or_else(|| DagitError::EmptyRef(candidate.to_string()).into());
        }

        if ObjectId::is_valid(&self.0) {
            return ObjectId::try_parse(self.0.clone());
        }

        Err(DagitError::UnknownName(self.0.clone()).into())
    }

    /// Ref names probed for this revision, most specific first
    fn candidate_refs(&self) -> Vec<SymRefName> {
        [
            self.0.clone(),
            format!("refs/{}", self.0),
            format!("refs/tags/{}", self.0),
            format!("refs/heads/{}", self.0),
        ]
        .into_iter()
        .filter_map(|candidate| SymRefName::try_parse(candidate).ok())
        .collect()
    }
}
